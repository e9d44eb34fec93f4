//! Location history: positions students share outside clock events.

use crate::errors::{AppError, AppResult};
use crate::models::clock_event::{format_instant, parse_instant};
use crate::models::coords::Coordinates;
use crate::models::location::Location;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};

fn map_location(row: &Row) -> rusqlite::Result<Location> {
    let ts: String = row.get("recorded_at")?;
    let recorded_at = parse_instant(&ts).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            6,
            Type::Text,
            Box::new(AppError::InvalidTimestamp(ts.clone())),
        )
    })?;

    Ok(Location {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        coords: Coordinates::new(row.get("lat")?, row.get("lng")?, row.get("accuracy")?),
        notes: row.get("notes")?,
        recorded_at,
    })
}

pub fn insert_location(
    conn: &Connection,
    user_id: i64,
    coords: &Coordinates,
    notes: Option<&str>,
    at: DateTime<Utc>,
) -> AppResult<i64> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO locations (user_id, lat, lng, accuracy, notes, recorded_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;
    stmt.execute(params![
        user_id,
        coords.lat,
        coords.lng,
        coords.accuracy,
        notes,
        format_instant(&at),
    ])?;
    Ok(conn.last_insert_rowid())
}

/// Newest first, at most `limit` rows.
pub fn recent_locations(conn: &Connection, user_id: i64, limit: usize) -> AppResult<Vec<Location>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM locations
         WHERE user_id = ?1
         ORDER BY recorded_at DESC, id DESC
         LIMIT ?2",
    )?;
    let rows = stmt.query_map(params![user_id, limit as i64], map_location)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Last known position (None once the history is cleared).
pub fn last_location(conn: &Connection, user_id: i64) -> AppResult<Option<Location>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM locations
         WHERE user_id = ?1
         ORDER BY recorded_at DESC, id DESC
         LIMIT 1",
    )?;
    Ok(stmt.query_row([user_id], map_location).optional()?)
}

pub fn clear_locations(conn: &Connection, user_id: i64) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM locations WHERE user_id = ?1", [user_id])?)
}

pub fn clear_all_locations(conn: &Connection) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM locations", [])?)
}
