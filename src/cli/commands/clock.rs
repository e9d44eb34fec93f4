use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::ledger::{AttendanceLedger, RecordOutcome};
use crate::db::users::require_by_code;
use crate::errors::{AppError, AppResult};
use crate::models::event_kind::EventKind;
use crate::models::user::User;
use crate::ui::messages::success;
use crate::utils::formatting::format_duration;
use crate::utils::time::parse_optional_timestamp;
use crate::utils::validate::coords_from_flags;
use chrono_tz::Tz;

use super::open_pool;

/// Record a clock-in or clock-out.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Clock {
        student,
        kind,
        at,
        lat,
        lng,
        accuracy,
        json,
    } = cmd
    {
        //
        // 1. Parse input
        //
        let kind = EventKind::parse(kind).ok_or_else(|| AppError::InvalidEventKind(kind.clone()))?;
        let timestamp = parse_optional_timestamp(at.as_ref())?;
        let coords = coords_from_flags(*lat, *lng, *accuracy)?;
        let tz = cfg.reference_tz()?;

        //
        // 2. Resolve student and record inside one unit of work
        //
        let mut pool = open_pool(cfg)?;
        let user = require_by_code(&pool.conn, student)?;

        let ledger = AttendanceLedger::new(tz).with_source(&cfg.default_source);
        let outcome =
            pool.unit_of_work(|tx| ledger.record(tx, user.id, kind, timestamp, coords))?;

        //
        // 3. Report
        //
        if *json {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        } else {
            print_outcome(&user, &outcome, &tz);
        }
    }

    Ok(())
}

fn print_outcome(user: &User, outcome: &RecordOutcome, tz: &Tz) {
    let local = outcome
        .recorded_at
        .with_timezone(tz)
        .format("%Y-%m-%d %H:%M:%S %Z");

    match outcome.kind {
        EventKind::ClockIn => success(format!(
            "{} clocked in at {} (event #{}).",
            user.student_code, local, outcome.event_id
        )),
        EventKind::ClockOut => {
            success(format!(
                "{} clocked out at {} (event #{}), session {}.",
                user.student_code,
                local,
                outcome.event_id,
                format_duration(outcome.total_seconds())
            ));
            for slice in &outcome.applied {
                println!("   {}  +{}", slice.day_str(), format_duration(slice.seconds));
            }
        }
    }
}
