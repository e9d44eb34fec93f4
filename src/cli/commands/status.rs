use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::ledger::AttendanceLedger;
use crate::db::locations::last_location;
use crate::db::users::require_by_code;
use crate::errors::AppResult;
use crate::models::session_state::SessionState;
use crate::ui::messages::info;
use crate::utils::formatting::format_duration;
use chrono::Utc;

use super::open_pool;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Status { student } = cmd else {
        return Ok(());
    };

    let tz = cfg.reference_tz()?;
    let pool = open_pool(cfg)?;
    let user = require_by_code(&pool.conn, student)?;

    let ledger = AttendanceLedger::new(tz);
    match ledger.session_state(&pool.conn, user.id)? {
        SessionState::OpenSession { since, .. } => info(format!(
            "{} is clocked in since {} ({} ago).",
            user.student_code,
            since.with_timezone(&tz).format("%Y-%m-%d %H:%M:%S %Z"),
            format_duration((Utc::now() - since).num_seconds())
        )),
        SessionState::NoOpenSession {
            last_event: Some((_, at)),
        } => info(format!(
            "{} is not clocked in (last clock-out {}).",
            user.student_code,
            at.with_timezone(&tz).format("%Y-%m-%d %H:%M:%S %Z")
        )),
        SessionState::NoOpenSession { last_event: None } => info(format!(
            "{} is not clocked in (no clock events yet).",
            user.student_code
        )),
    }

    if let Some(loc) = last_location(&pool.conn, user.id)? {
        info(format!(
            "Last seen at {} on {}.",
            loc.coords.short(),
            loc.recorded_at.with_timezone(&tz).format("%Y-%m-%d %H:%M:%S %Z")
        ));
    }

    Ok(())
}
