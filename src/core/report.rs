use crate::db::pool::DbPool;
use crate::db::queries::list_all_daily_totals;
use crate::errors::AppResult;
use crate::ui::messages::{header, warning};
use crate::utils::colors::colorize_optional;
use crate::utils::formatting::{bold, format_duration};
use crate::utils::table::{Column, Table};
use chrono::NaiveDate;
use std::collections::BTreeSet;

pub struct ReportLogic;

impl ReportLogic {
    /// Every student's daily totals, by day then student code.
    pub fn print(pool: &mut DbPool, range: Option<(NaiveDate, NaiveDate)>) -> AppResult<()> {
        let rows = list_all_daily_totals(&pool.conn, range)?;

        header("Time on campus: all students");

        if rows.is_empty() {
            warning("No daily totals for the selected period.");
            return Ok(());
        }

        let mut table = Table::new(vec![
            Column::new("Day", 10),
            Column::new("Code", 4),
            Column::new("Name", 4),
            Column::new("Total", 8),
        ]);

        let mut grand = 0;
        let mut students = BTreeSet::new();
        for r in &rows {
            grand += r.total.total_seconds;
            students.insert(r.student_code.as_str());
            table.add_row(vec![
                r.total.day.format("%Y-%m-%d").to_string(),
                r.student_code.clone(),
                r.full_name.clone(),
                colorize_optional(&format_duration(r.total.total_seconds)),
            ]);
        }

        print!("{}", table.render());
        println!(
            "\n{} {} across {} student(s)",
            bold("TOTAL"),
            format_duration(grand),
            students.len()
        );
        Ok(())
    }
}
