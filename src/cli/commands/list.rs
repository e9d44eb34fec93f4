use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::list::ListLogic;
use crate::db::users::require_by_code;
use crate::errors::AppResult;
use crate::utils::date::parse_period;

use super::open_pool;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List {
        student,
        period,
        events,
    } = cmd
    {
        let range = match period {
            Some(p) => parse_period(p)?,
            None => None,
        };
        let tz = cfg.reference_tz()?;

        let mut pool = open_pool(cfg)?;
        let user = require_by_code(&pool.conn, student)?;

        if *events {
            ListLogic::print_events(&mut pool, &user, &tz, range)?;
        } else {
            ListLogic::print_totals(&mut pool, &user, range)?;
        }
    }

    Ok(())
}
