use crate::errors::{AppError, AppResult};
use crate::models::clock_event::{ClockEvent, format_instant, parse_instant};
use crate::models::coords::Coordinates;
use crate::models::daily_total::{DailyTotal, DaySlice, StudentDailyTotal};
use crate::models::event_kind::EventKind;
use crate::models::session_state::SessionState;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

/// Event about to be appended; `id` and `created_at` are assigned on insert.
#[derive(Debug, Clone)]
pub struct NewClockEvent<'a> {
    pub user_id: i64,
    pub kind: EventKind,
    pub recorded_at: DateTime<Utc>,
    pub coords: Option<Coordinates>,
    pub prev_event_id: i64,
    pub source: &'a str,
}

fn conversion_error(col: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(col, Type::Text, Box::new(err))
}

pub fn map_event_row(row: &Row) -> Result<ClockEvent> {
    let kind_str: String = row.get("kind")?;
    let kind = EventKind::from_db_str(&kind_str)
        .ok_or_else(|| conversion_error(2, AppError::InvalidEventKind(kind_str.clone())))?;

    let ts_str: String = row.get("recorded_at")?;
    let recorded_at = parse_instant(&ts_str)
        .ok_or_else(|| conversion_error(3, AppError::InvalidTimestamp(ts_str.clone())))?;

    let coords = Coordinates::from_columns(
        row.get("lat")?,
        row.get("lng")?,
        row.get("accuracy")?,
    );

    Ok(ClockEvent {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        kind,
        recorded_at,
        coords,
        prev_event_id: row.get("prev_event_id")?,
        source: row.get("source")?,
        created_at: row.get("created_at")?,
    })
}

fn map_total_row(row: &Row) -> Result<DailyTotal> {
    let day_str: String = row.get("day")?;
    let day = NaiveDate::parse_from_str(&day_str, "%Y-%m-%d")
        .map_err(|_| conversion_error(2, AppError::InvalidDate(day_str.clone())))?;

    Ok(DailyTotal {
        user_id: row.get("user_id")?,
        day,
        total_seconds: row.get("total_seconds")?,
    })
}

/// Append a clock event and return its id.
///
/// Fails with the raw SQLite constraint error if another event already
/// claims `prev_event_id` for this user; the ledger maps that to Conflict.
pub fn insert_clock_event(conn: &Connection, ev: &NewClockEvent<'_>) -> Result<i64> {
    let (lat, lng, accuracy) = match ev.coords {
        Some(c) => (Some(c.lat), Some(c.lng), c.accuracy),
        None => (None, None, None),
    };

    let mut stmt = conn.prepare_cached(
        "INSERT INTO clock_events
            (user_id, kind, recorded_at, lat, lng, accuracy, prev_event_id, source, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )?;
    stmt.execute(params![
        ev.user_id,
        ev.kind.to_db_str(),
        format_instant(&ev.recorded_at),
        lat,
        lng,
        accuracy,
        ev.prev_event_id,
        ev.source,
        Utc::now().to_rfc3339(),
    ])?;

    Ok(conn.last_insert_rowid())
}

/// Most recent event for `user_id` (tip of the event chain).
pub fn last_event_for_user(conn: &Connection, user_id: i64) -> Result<Option<ClockEvent>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM clock_events
         WHERE user_id = ?1
         ORDER BY id DESC
         LIMIT 1",
    )?;
    stmt.query_row([user_id], map_event_row).optional()
}

/// Read the user's session state from their most recent event.
pub fn session_state(conn: &Connection, user_id: i64) -> Result<SessionState> {
    Ok(match last_event_for_user(conn, user_id)? {
        Some(ev) if ev.kind.is_in() => SessionState::OpenSession {
            event_id: ev.id,
            since: ev.recorded_at,
        },
        Some(ev) => SessionState::NoOpenSession {
            last_event: Some((ev.id, ev.recorded_at)),
        },
        None => SessionState::NoOpenSession { last_event: None },
    })
}

/// Add `slice.seconds` to the (user, day) total, creating the row if absent.
pub fn add_to_daily_total(conn: &Connection, user_id: i64, slice: &DaySlice) -> Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO daily_totals (user_id, day, total_seconds)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(user_id, day)
         DO UPDATE SET total_seconds = total_seconds + excluded.total_seconds",
    )?;
    stmt.execute(params![user_id, slice.day_str(), slice.seconds])?;
    Ok(())
}

pub fn get_daily_total(conn: &Connection, user_id: i64, day: &NaiveDate) -> Result<Option<i64>> {
    let mut stmt = conn.prepare_cached(
        "SELECT total_seconds FROM daily_totals WHERE user_id = ?1 AND day = ?2",
    )?;
    stmt.query_row(params![user_id, day.format("%Y-%m-%d").to_string()], |r| {
        r.get(0)
    })
    .optional()
}

/// Daily totals for a user, optionally restricted to an inclusive day range.
pub fn list_daily_totals(
    conn: &Connection,
    user_id: i64,
    range: Option<(NaiveDate, NaiveDate)>,
) -> AppResult<Vec<DailyTotal>> {
    let (from, to) = match range {
        Some((a, b)) => (a.format("%Y-%m-%d").to_string(), b.format("%Y-%m-%d").to_string()),
        None => ("0000-01-01".to_string(), "9999-12-31".to_string()),
    };

    let mut stmt = conn.prepare_cached(
        "SELECT user_id, day, total_seconds FROM daily_totals
         WHERE user_id = ?1 AND day >= ?2 AND day <= ?3
         ORDER BY day ASC",
    )?;
    let rows = stmt.query_map(params![user_id, from, to], map_total_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Daily totals of every student, ordered by day then student code.
pub fn list_all_daily_totals(
    conn: &Connection,
    range: Option<(NaiveDate, NaiveDate)>,
) -> AppResult<Vec<StudentDailyTotal>> {
    let (from, to) = match range {
        Some((a, b)) => (a.format("%Y-%m-%d").to_string(), b.format("%Y-%m-%d").to_string()),
        None => ("0000-01-01".to_string(), "9999-12-31".to_string()),
    };

    let mut stmt = conn.prepare_cached(
        "SELECT d.user_id AS user_id, d.day AS day, d.total_seconds AS total_seconds,
                u.student_code AS student_code, u.first_name || ' ' || u.last_name AS full_name
         FROM daily_totals d
         JOIN users u ON u.id = d.user_id
         WHERE d.day >= ?1 AND d.day <= ?2
         ORDER BY d.day ASC, u.student_code ASC",
    )?;
    let rows = stmt.query_map(params![from, to], |row| {
        Ok(StudentDailyTotal {
            student_code: row.get("student_code")?,
            full_name: row.get("full_name")?,
            total: map_total_row(row)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Events for a user, optionally restricted to `[from, to)` instants.
pub fn list_events(
    conn: &Connection,
    user_id: i64,
    window: Option<(DateTime<Utc>, DateTime<Utc>)>,
) -> AppResult<Vec<ClockEvent>> {
    let mut stmt = match window {
        Some(_) => conn.prepare_cached(
            "SELECT * FROM clock_events
             WHERE user_id = ?1 AND recorded_at >= ?2 AND recorded_at < ?3
             ORDER BY id ASC",
        )?,
        None => conn.prepare_cached(
            "SELECT * FROM clock_events WHERE user_id = ?1 ORDER BY id ASC",
        )?,
    };

    let rows = match window {
        Some((from, to)) => stmt.query_map(
            params![user_id, format_instant(&from), format_instant(&to)],
            map_event_row,
        )?,
        None => stmt.query_map([user_id], map_event_row)?,
    };

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
