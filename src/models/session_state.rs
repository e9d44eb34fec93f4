use chrono::{DateTime, Utc};

/// Where a user stands, derived from their most recent clock event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No clock-in awaiting a clock-out. `last_event` is the most recent
    /// event (always a clock-out) or `None` for a user with no history.
    NoOpenSession {
        last_event: Option<(i64, DateTime<Utc>)>,
    },
    /// Clocked in since `since`, by event `event_id`.
    OpenSession { event_id: i64, since: DateTime<Utc> },
}

impl SessionState {
    pub fn is_open(&self) -> bool {
        matches!(self, SessionState::OpenSession { .. })
    }

    /// Id of the most recent event, `0` when the user has none.
    pub fn last_event_id(&self) -> i64 {
        match self {
            SessionState::OpenSession { event_id, .. } => *event_id,
            SessionState::NoOpenSession {
                last_event: Some((id, _)),
            } => *id,
            SessionState::NoOpenSession { last_event: None } => 0,
        }
    }
}
