//! Attendance ledger: validates clock events against the user's session
//! state, appends them, and reconciles closed sessions into daily totals.

use crate::core::calculator::day_split::split_interval;
use crate::db::log::{TIMEZONE_PINNED, pinned_timezone, ttlog};
use crate::db::queries::{self, NewClockEvent};
use crate::db::users;
use crate::errors::{AppError, AppResult};
use crate::models::clock_event::format_instant;
use crate::models::coords::Coordinates;
use crate::models::daily_total::DaySlice;
use crate::models::event_kind::EventKind;
use crate::models::session_state::SessionState;
use crate::utils::formatting::secs2readable;
use chrono::{DateTime, SubsecRound, Utc};
use chrono_tz::Tz;
use rusqlite::{Connection, Transaction};
use serde::Serialize;
use tracing::{debug, warn};

/// Result of a successful `record`.
#[derive(Debug, Clone, Serialize)]
pub struct RecordOutcome {
    pub event_id: i64,
    pub kind: EventKind,
    pub recorded_at: DateTime<Utc>,
    /// Day totals touched by this event; empty for clock-ins.
    pub applied: Vec<DaySlice>,
}

impl RecordOutcome {
    pub fn total_seconds(&self) -> i64 {
        self.applied.iter().map(|s| s.seconds).sum()
    }
}

pub struct AttendanceLedger {
    tz: Tz,
    source: String,
}

impl AttendanceLedger {
    /// `tz` decides where days begin and end.
    pub fn new(tz: Tz) -> Self {
        Self {
            tz,
            source: "cli".to_string(),
        }
    }

    /// Tag recorded events with their origin (defaults to `cli`).
    pub fn with_source(mut self, source: &str) -> Self {
        self.source = source.to_string();
        self
    }

    pub fn session_state(&self, conn: &Connection, user_id: i64) -> AppResult<SessionState> {
        if !users::user_exists(conn, user_id)? {
            return Err(AppError::NotFound(format!("user {}", user_id)));
        }
        Ok(queries::session_state(conn, user_id)?)
    }

    /// Record a clock event for `user_id` inside the unit of work `tx`.
    ///
    /// `timestamp` defaults to now. On a clock-out the closed session is split
    /// across the reference-timezone days it touches and each day's total is
    /// incremented. Nothing is visible to other connections until the caller
    /// commits `tx`; on error the caller drops it and nothing persists.
    pub fn record(
        &self,
        tx: &Transaction<'_>,
        user_id: i64,
        kind: EventKind,
        timestamp: Option<DateTime<Utc>>,
        coords: Option<Coordinates>,
    ) -> AppResult<RecordOutcome> {
        let at = timestamp.unwrap_or_else(Utc::now).trunc_subsecs(0);
        debug!(user_id, kind = kind.to_db_str(), at = %at, "recording clock event");

        let state = self.session_state(tx, user_id)?;
        self.ensure_reference_timezone(tx)?;
        let open_since = check_transition(kind, &state, at).inspect_err(|e| {
            warn!(user_id, kind = kind.to_db_str(), error = %e, "clock event rejected");
        })?;

        let event_id = queries::insert_clock_event(
            tx,
            &NewClockEvent {
                user_id,
                kind,
                recorded_at: at,
                coords,
                prev_event_id: state.last_event_id(),
                source: &self.source,
            },
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(f, _)
                if f.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                AppError::Conflict("another clock event for this user was recorded concurrently".into())
            }
            other => AppError::Db(other),
        })?;

        let applied = match open_since {
            Some(since) => {
                let slices = split_interval(&self.tz, since, at);
                for slice in &slices {
                    queries::add_to_daily_total(tx, user_id, slice)?;
                }
                slices
            }
            None => Vec::new(),
        };

        let outcome = RecordOutcome {
            event_id,
            kind,
            recorded_at: at,
            applied,
        };

        let message = match kind {
            EventKind::ClockIn => format!("clock in at {}", format_instant(&at)),
            EventKind::ClockOut => format!(
                "clock out at {} ({} over {} day(s))",
                format_instant(&at),
                secs2readable(outcome.total_seconds()),
                outcome.applied.len()
            ),
        };
        ttlog(tx, kind.to_db_str(), &format!("user {}", user_id), &message)?;

        debug!(user_id, event_id, days = outcome.applied.len(), "clock event recorded");
        Ok(outcome)
    }
}

impl AttendanceLedger {
    /// Days already stored were cut in the pinned timezone; mixing in
    /// another one would key `daily_totals` inconsistently. The first
    /// recorded event pins the ledger's timezone.
    fn ensure_reference_timezone(&self, conn: &Connection) -> AppResult<()> {
        let configured = self.tz.name();
        match pinned_timezone(conn)? {
            Some(stored) if stored == configured => Ok(()),
            Some(stored) => Err(AppError::TimezoneMismatch {
                configured: configured.to_string(),
                stored,
            }),
            None => {
                debug!(tz = configured, "pinning reference timezone");
                ttlog(
                    conn,
                    TIMEZONE_PINNED,
                    configured,
                    &format!("daily totals are keyed by {}", configured),
                )
            }
        }
    }
}

/// Validate `kind` at instant `at` against `state`.
///
/// Returns the start of the session being closed for a valid clock-out,
/// `None` for a valid clock-in.
fn check_transition(
    kind: EventKind,
    state: &SessionState,
    at: DateTime<Utc>,
) -> AppResult<Option<DateTime<Utc>>> {
    match (kind, state) {
        (EventKind::ClockIn, SessionState::OpenSession { since, .. }) => Err(AppError::Conflict(
            format!("already clocked in since {}", format_instant(since)),
        )),
        (EventKind::ClockIn, SessionState::NoOpenSession { last_event }) => match last_event {
            Some((_, last_out)) if at < *last_out => Err(AppError::Conflict(format!(
                "clock-in precedes last clock-out at {}",
                format_instant(last_out)
            ))),
            _ => Ok(None),
        },
        (EventKind::ClockOut, SessionState::NoOpenSession { .. }) => {
            Err(AppError::Conflict("not clocked in".into()))
        }
        (EventKind::ClockOut, SessionState::OpenSession { since, .. }) => {
            if at <= *since {
                Err(AppError::Conflict(format!(
                    "clock-out precedes clock-in at {}",
                    format_instant(since)
                )))
            } else {
                Ok(Some(*since))
            }
        }
    }
}
