use crate::db::locations::{
    clear_all_locations, clear_locations, insert_location, recent_locations,
};
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::clock_event::format_instant;
use crate::models::coords::Coordinates;
use crate::models::user::User;
use crate::ui::messages::{header, warning};
use crate::utils::colors::colorize_optional;
use crate::utils::table::{Column, Table};
use chrono::{DateTime, SubsecRound, Utc};
use chrono_tz::Tz;

pub struct LocationLogic;

impl LocationLogic {
    /// Append a position to the student's history; returns the row id.
    pub fn share(
        pool: &mut DbPool,
        user: &User,
        coords: &Coordinates,
        notes: Option<&str>,
        at: Option<DateTime<Utc>>,
    ) -> AppResult<i64> {
        let at = at.unwrap_or_else(Utc::now).trunc_subsecs(0);
        let notes = notes.map(str::trim).filter(|n| !n.is_empty());

        pool.unit_of_work(|tx| {
            let id = insert_location(tx, user.id, coords, notes, at)?;
            ttlog(
                tx,
                "location_share",
                &user.student_code,
                &format!("{} at {}", coords.short(), format_instant(&at)),
            )?;
            Ok(id)
        })
    }

    /// Clear one student's history, or everyone's when `user` is None.
    pub fn clear(pool: &mut DbPool, user: Option<&User>) -> AppResult<usize> {
        pool.unit_of_work(|tx| {
            let (deleted, target) = match user {
                Some(u) => (clear_locations(tx, u.id)?, u.student_code.as_str()),
                None => (clear_all_locations(tx)?, "all"),
            };
            ttlog(
                tx,
                "location_clear",
                target,
                &format!("cleared {} location record(s)", deleted),
            )?;
            Ok(deleted)
        })
    }

    pub fn print_history(pool: &mut DbPool, user: &User, tz: &Tz, limit: usize) -> AppResult<()> {
        let history = recent_locations(&pool.conn, user.id, limit)?;

        header(format!("Locations: {} ({})", user.full_name(), user.student_code));

        if history.is_empty() {
            warning("No shared locations.");
            return Ok(());
        }

        let mut table = Table::new(vec![
            Column::new("Local time", 19),
            Column::new("Coordinates", 11),
            Column::new("Accuracy", 8),
            Column::new("Notes", 5),
        ]);

        for loc in &history {
            table.add_row(vec![
                loc.recorded_at
                    .with_timezone(tz)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string(),
                loc.coords.short(),
                colorize_optional(
                    &loc.coords
                        .accuracy
                        .map(|a| format!("{:.0} m", a))
                        .unwrap_or_else(|| "--".into()),
                ),
                colorize_optional(loc.notes.as_deref().unwrap_or("--")),
            ]);
        }

        print!("{}", table.render());
        Ok(())
    }
}
