use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::export::{ExportLogic, ExportRequest};
use crate::core::report::ReportLogic;
use crate::errors::AppResult;
use crate::utils::date::parse_period;

use super::open_pool;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Report {
        period,
        format,
        file,
        force,
    } = cmd
    {
        let range = match period {
            Some(p) => parse_period(p)?,
            None => None,
        };

        let mut pool = open_pool(cfg)?;

        match file {
            Some(file) => {
                let req = ExportRequest {
                    format: *format,
                    file,
                    range,
                    events: false,
                    force: *force,
                };
                ExportLogic::export_report(&mut pool, &req)?;
            }
            None => ReportLogic::print(&mut pool, range)?,
        }
    }

    Ok(())
}
