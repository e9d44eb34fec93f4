use super::{coords::Coordinates, event_kind::EventKind};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ClockEvent {
    pub id: i64,
    pub user_id: i64,
    pub kind: EventKind,            // ⇔ clock_events.kind ('clock_in' | 'clock_out')
    pub recorded_at: DateTime<Utc>, // ⇔ clock_events.recorded_at (TEXT, RFC 3339, seconds)
    pub coords: Option<Coordinates>,
    pub prev_event_id: i64, // ⇔ clock_events.prev_event_id (0 for the first event)
    pub source: String,
    pub created_at: String,
}

impl ClockEvent {
    pub fn recorded_at_str(&self) -> String {
        format_instant(&self.recorded_at)
    }
}

/// Canonical storage form for instants. Fixed width and always `Z`, so
/// lexical order in SQL matches chronological order.
pub fn format_instant(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
