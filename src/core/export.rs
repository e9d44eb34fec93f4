use crate::core::list::event_window;
use crate::db::pool::DbPool;
use crate::db::queries::{list_all_daily_totals, list_daily_totals, list_events};
use crate::errors::{AppError, AppResult};
use crate::export::{
    EventExport, ExportFormat, TotalExport, ensure_writable, notify_export_success, write_csv,
    write_json,
};
use crate::models::user::User;
use crate::ui::messages::warning;
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::Serialize;
use std::path::Path;

/// What to export and where.
pub struct ExportRequest<'a> {
    pub format: ExportFormat,
    pub file: &'a str,
    pub range: Option<(NaiveDate, NaiveDate)>,
    pub events: bool,
    pub force: bool,
}

pub struct ExportLogic;

fn write_rows<T: Serialize>(format: ExportFormat, path: &Path, rows: &[T]) -> AppResult<()> {
    match format {
        ExportFormat::Csv => write_csv(path, rows),
        ExportFormat::Json => write_json(path, rows),
    }
}

/// Output path must be absolute and either new or explicitly overwritable.
fn checked_output_path<'a>(req: &ExportRequest<'a>) -> AppResult<&'a Path> {
    let path = Path::new(req.file);

    if !path.is_absolute() {
        return Err(AppError::Export(format!(
            "output file path must be absolute: {}",
            req.file
        )));
    }

    ensure_writable(path, req.force)?;
    Ok(path)
}

impl ExportLogic {
    /// Export a student's daily totals (default) or raw clock events.
    /// Returns the number of rows written.
    pub fn export(
        pool: &mut DbPool,
        user: &User,
        tz: &Tz,
        req: &ExportRequest<'_>,
    ) -> AppResult<usize> {
        let path = checked_output_path(req)?;

        let rows = if req.events {
            let rows: Vec<EventExport> = list_events(&pool.conn, user.id, event_window(tz, req.range))?
                .iter()
                .map(|ev| EventExport::from_event(user, ev, tz))
                .collect();
            if !rows.is_empty() {
                write_rows(req.format, path, &rows)?;
            }
            rows.len()
        } else {
            let rows: Vec<TotalExport> = list_daily_totals(&pool.conn, user.id, req.range)?
                .iter()
                .map(|t| TotalExport::from_total(user, t))
                .collect();
            if !rows.is_empty() {
                write_rows(req.format, path, &rows)?;
            }
            rows.len()
        };

        if rows == 0 {
            warning("No data found for the selected period; nothing written.");
        } else {
            let label = format!(
                "{} {}",
                req.format.as_str().to_uppercase(),
                if req.events { "events" } else { "daily totals" }
            );
            notify_export_success(&label, rows, path);
        }

        Ok(rows)
    }

    /// Export every student's daily totals (`req.events` is ignored).
    pub fn export_report(pool: &mut DbPool, req: &ExportRequest<'_>) -> AppResult<usize> {
        let path = checked_output_path(req)?;

        let rows: Vec<TotalExport> = list_all_daily_totals(&pool.conn, req.range)?
            .iter()
            .map(TotalExport::from_student_total)
            .collect();

        if rows.is_empty() {
            warning("No data found for the selected period; nothing written.");
            return Ok(0);
        }

        write_rows(req.format, path, &rows)?;
        notify_export_success(
            &format!("{} report", req.format.as_str().to_uppercase()),
            rows.len(),
            path,
        );
        Ok(rows.len())
    }
}
