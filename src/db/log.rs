use crate::errors::AppResult;
use chrono::Utc;
use rusqlite::params;
use rusqlite::{Connection, OptionalExtension};

/// Audit operation marking the timezone daily totals are keyed by.
pub const TIMEZONE_PINNED: &str = "timezone_pinned";

/// Write an audit line into the `log` table.
pub fn ttlog(conn: &Connection, operation: &str, target: &str, message: &str) -> AppResult<()> {
    let now = Utc::now().to_rfc3339();

    let mut stmt = conn.prepare_cached(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, ?2, ?3, ?4)",
    )?;

    stmt.execute(params![now, operation, target, message])?;

    Ok(())
}

/// Reference timezone recorded with the first clock event, if any.
pub fn pinned_timezone(conn: &Connection) -> AppResult<Option<String>> {
    let mut stmt = conn.prepare_cached(
        "SELECT target FROM log WHERE operation = ?1 ORDER BY id DESC LIMIT 1",
    )?;
    Ok(stmt.query_row([TIMEZONE_PINNED], |r| r.get(0)).optional()?)
}

/// Row of the `log` table.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

pub fn load_log(conn: &Connection) -> AppResult<Vec<LogEntry>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, date, operation, IFNULL(target, ''), message FROM log ORDER BY id ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(LogEntry {
            id: row.get(0)?,
            date: row.get(1)?,
            operation: row.get(2)?,
            target: row.get(3)?,
            message: row.get(4)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
