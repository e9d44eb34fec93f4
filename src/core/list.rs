use crate::core::calculator::day_split::start_of_day;
use crate::db::pool::DbPool;
use crate::db::queries::{list_daily_totals, list_events};
use crate::errors::AppResult;
use crate::models::user::User;
use crate::ui::messages::{header, warning};
use crate::utils::colors::{colorize_in_out, colorize_optional};
use crate::utils::formatting::{bold, format_duration};
use crate::utils::table::{Column, Table};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// UTC window `[from, to)` covering an inclusive range of local days.
pub fn event_window(
    tz: &Tz,
    range: Option<(NaiveDate, NaiveDate)>,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let (first, last) = range?;
    let from = start_of_day(tz, first)?;
    let to = start_of_day(tz, last.succ_opt()?)?;
    Some((from, to))
}

pub struct ListLogic;

impl ListLogic {
    pub fn print_totals(
        pool: &mut DbPool,
        user: &User,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> AppResult<()> {
        let totals = list_daily_totals(&pool.conn, user.id, range)?;

        header(format!("Time on campus: {} ({})", user.full_name(), user.student_code));

        if totals.is_empty() {
            warning("No daily totals for the selected period.");
            return Ok(());
        }

        let mut table = Table::new(vec![
            Column::new("Day", 10),
            Column::new("Weekday", 3),
            Column::new("Total", 8),
        ]);

        let mut grand = 0;
        for t in &totals {
            grand += t.total_seconds;
            table.add_row(vec![
                t.day.format("%Y-%m-%d").to_string(),
                t.day.format("%a").to_string(),
                colorize_optional(&format_duration(t.total_seconds)),
            ]);
        }

        print!("{}", table.render());
        println!(
            "\n{} {} over {} day(s)",
            bold("TOTAL"),
            format_duration(grand),
            totals.len()
        );
        Ok(())
    }

    pub fn print_events(
        pool: &mut DbPool,
        user: &User,
        tz: &Tz,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> AppResult<()> {
        let events = list_events(&pool.conn, user.id, event_window(tz, range))?;

        header(format!("Clock events: {} ({})", user.full_name(), user.student_code));

        if events.is_empty() {
            warning("No clock events for the selected period.");
            return Ok(());
        }

        let mut table = Table::new(vec![
            Column::new("ID", 2),
            Column::new("Local time", 19),
            Column::new("Kind", 4),
            Column::new("Coordinates", 11),
            Column::new("Source", 6),
        ]);

        for ev in &events {
            let local = ev.recorded_at.with_timezone(tz);
            table.add_row(vec![
                ev.id.to_string(),
                local.format("%Y-%m-%d %H:%M:%S").to_string(),
                colorize_in_out(ev.kind.label(), ev.kind.is_in()),
                colorize_optional(&ev.coords.map(|c| c.short()).unwrap_or_else(|| "--".into())),
                ev.source.clone(),
            ]);
        }

        print!("{}", table.render());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_covers_whole_local_days() {
        let d1 = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();

        let (from, to) = event_window(&chrono_tz::Europe::Rome, Some((d1, d2))).unwrap();
        assert_eq!(from.to_rfc3339(), "2024-12-31T23:00:00+00:00");
        assert_eq!(to.to_rfc3339(), "2025-01-02T23:00:00+00:00");

        assert!(event_window(&chrono_tz::UTC, None).is_none());
    }
}
