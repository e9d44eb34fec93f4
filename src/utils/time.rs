//! Time utilities: parsing instants from user input and the configured
//! reference timezone.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, NaiveDateTime, SubsecRound, TimeZone, Utc};
use chrono_tz::Tz;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a client-supplied timestamp.
///
/// RFC 3339 values (`Z` or an explicit offset) are converted to UTC. Values
/// without an offset are taken to be UTC already. Sub-second precision is
/// dropped.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc).trunc_subsecs(0));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive).trunc_subsecs(0))
}

pub fn parse_optional_timestamp(input: Option<&String>) -> AppResult<Option<DateTime<Utc>>> {
    match input {
        Some(s) => parse_timestamp(s)
            .map(Some)
            .ok_or_else(|| AppError::InvalidTimestamp(s.to_string())),
        None => Ok(None),
    }
}

/// Resolve an IANA timezone name (`UTC`, `Europe/Rome`, ...).
pub fn parse_timezone(name: &str) -> AppResult<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| AppError::InvalidTimezone(name.to_string()))
}
