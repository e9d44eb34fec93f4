use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::export::{ExportLogic, ExportRequest};
use crate::db::users::require_by_code;
use crate::errors::AppResult;
use crate::utils::date::parse_period;

use super::open_pool;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        student,
        format,
        file,
        period,
        events,
        force,
    } = cmd
    {
        let range = match period {
            Some(p) => parse_period(p)?,
            None => None,
        };
        let tz = cfg.reference_tz()?;

        let mut pool = open_pool(cfg)?;
        let user = require_by_code(&pool.conn, student)?;

        let req = ExportRequest {
            format: *format,
            file,
            range,
            events: *events,
            force: *force,
        };
        ExportLogic::export(&mut pool, &user, &tz, &req)?;
    }

    Ok(())
}
