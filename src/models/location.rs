use super::coords::Coordinates;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A shared position, independent of clock events.
#[derive(Debug, Clone, Serialize)]
pub struct Location {
    pub id: i64,
    pub user_id: i64,
    pub coords: Coordinates,
    pub notes: Option<String>,
    pub recorded_at: DateTime<Utc>, // ⇔ locations.recorded_at (TEXT, RFC 3339, seconds)
}
