//! Date utilities: parsing days and `--period` expressions.

use crate::errors::{AppError, AppResult};
use chrono::{Datelike, NaiveDate};

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn month_last_day(year: i32, month: u32) -> Option<NaiveDate> {
    let (ny, nm) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(ny, nm, 1)?.pred_opt()
}

/// First and last day covered by a single period token.
fn bounds_of(token: &str) -> Option<(NaiveDate, NaiveDate)> {
    match token.len() {
        // YYYY
        4 => {
            let y: i32 = token.parse().ok()?;
            Some((
                NaiveDate::from_ymd_opt(y, 1, 1)?,
                NaiveDate::from_ymd_opt(y, 12, 31)?,
            ))
        }
        // YYYY-MM
        7 => {
            let first = NaiveDate::parse_from_str(&format!("{token}-01"), "%Y-%m-%d").ok()?;
            Some((first, month_last_day(first.year(), first.month())?))
        }
        // YYYY-MM-DD
        10 => {
            let d = parse_date(token)?;
            Some((d, d))
        }
        _ => None,
    }
}

/// Parse `--period` into an inclusive day range.
///
/// Supports:
/// - `all` (→ `None`)
/// - `YYYY`, `YYYY-MM`, `YYYY-MM-DD`
/// - `start:end` ranges of the same granularity (`2025-01:2025-03`)
pub fn parse_period(p: &str) -> AppResult<Option<(NaiveDate, NaiveDate)>> {
    let p = p.trim();
    if p.eq_ignore_ascii_case("all") {
        return Ok(None);
    }

    let invalid = || AppError::InvalidPeriod(p.to_string());

    if let Some((start_raw, end_raw)) = p.split_once(':') {
        let start = start_raw.trim();
        let end = end_raw.trim();

        if start.is_empty() || start.len() != end.len() {
            return Err(invalid());
        }

        let (from, _) = bounds_of(start).ok_or_else(invalid)?;
        let (_, to) = bounds_of(end).ok_or_else(invalid)?;

        if to < from {
            return Err(invalid());
        }
        return Ok(Some((from, to)));
    }

    bounds_of(p).map(Some).ok_or_else(invalid)
}
