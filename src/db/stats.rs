use crate::db::log::TIMEZONE_PINNED;
use crate::db::pool::DbPool;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use crate::utils::formatting::format_duration;
use rusqlite::OptionalExtension;
use std::fs;

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) COUNTS
    //
    let users: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
    let events: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM clock_events", [], |row| row.get(0))?;
    let open: i64 = pool.conn.query_row(
        "SELECT COUNT(*) FROM clock_events e
         WHERE e.kind = 'clock_in'
           AND e.id = (SELECT MAX(id) FROM clock_events WHERE user_id = e.user_id)",
        [],
        |row| row.get(0),
    )?;

    println!("{}• Students:{} {}{}{}", CYAN, RESET, GREEN, users, RESET);
    println!("{}• Clock events:{} {}{}{}", CYAN, RESET, GREEN, events, RESET);
    let locations: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM locations", [], |row| row.get(0))?;

    println!("{}• Open sessions:{} {}{}{}", CYAN, RESET, GREEN, open, RESET);
    println!("{}• Shared locations:{} {}{}{}", CYAN, RESET, GREEN, locations, RESET);

    //
    // 3) DAY RANGE
    //
    let first_day: Option<String> = pool
        .conn
        .query_row("SELECT MIN(day) FROM daily_totals", [], |row| row.get(0))
        .optional()?
        .flatten();
    let last_day: Option<String> = pool
        .conn
        .query_row("SELECT MAX(day) FROM daily_totals", [], |row| row.get(0))
        .optional()?
        .flatten();

    println!("{}• Day range:{}", CYAN, RESET);
    println!(
        "    from: {}",
        first_day.unwrap_or_else(|| format!("{GREY}--{RESET}"))
    );
    println!(
        "    to:   {}",
        last_day.unwrap_or_else(|| format!("{GREY}--{RESET}"))
    );

    let tz = pool
        .conn
        .query_row(
            "SELECT target FROM log WHERE operation = ?1 ORDER BY id DESC LIMIT 1",
            [TIMEZONE_PINNED],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    println!(
        "{}• Reference timezone:{} {}",
        CYAN,
        RESET,
        tz.unwrap_or_else(|| format!("{GREY}not pinned yet{RESET}"))
    );

    //
    // 4) TOTAL TIME
    //
    let total: i64 = pool.conn.query_row(
        "SELECT IFNULL(SUM(total_seconds), 0) FROM daily_totals",
        [],
        |row| row.get(0),
    )?;
    println!(
        "{}• Time on campus:{} {}",
        CYAN,
        RESET,
        format_duration(total)
    );

    println!();
    Ok(())
}
