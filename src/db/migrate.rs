use crate::ui::messages::success;
use rusqlite::{Connection, Error, OptionalExtension, Result};

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{}')", table))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Student registry consulted for user existence.
fn create_users_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            student_code  TEXT NOT NULL UNIQUE,
            email         TEXT NOT NULL UNIQUE,
            first_name    TEXT NOT NULL,
            last_name     TEXT NOT NULL,
            created_at    TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Append-only event log. `prev_event_id` links every event to the user's
/// previous one (0 for the first); the unique index keeps each user's chain
/// linear so two writers acting on the same state cannot both commit.
fn create_clock_events_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS clock_events (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id        INTEGER NOT NULL REFERENCES users(id),
            kind           TEXT NOT NULL CHECK(kind IN ('clock_in','clock_out')),
            recorded_at    TEXT NOT NULL,
            lat            REAL,
            lng            REAL,
            accuracy       REAL,
            prev_event_id  INTEGER NOT NULL DEFAULT 0,
            created_at     TEXT NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS ux_clock_events_chain
            ON clock_events(user_id, prev_event_id);
        CREATE INDEX IF NOT EXISTS idx_clock_events_user_time
            ON clock_events(user_id, recorded_at);
        "#,
    )?;
    Ok(())
}

fn create_daily_totals_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS daily_totals (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id        INTEGER NOT NULL REFERENCES users(id),
            day            TEXT NOT NULL,
            total_seconds  INTEGER NOT NULL DEFAULT 0 CHECK(total_seconds >= 0),
            UNIQUE(user_id, day)
        );

        CREATE INDEX IF NOT EXISTS idx_daily_totals_day ON daily_totals(day);
        "#,
    )?;
    Ok(())
}

fn migration_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    Ok(())
}

/// Record where each event came from (cli, api, import...).
fn migrate_add_source_column(conn: &Connection) -> Result<(), Error> {
    let version = "20250310_0002_add_event_source";

    if migration_applied(conn, version)? {
        return Ok(());
    }

    if !table_has_column(conn, "clock_events", "source")? {
        conn.execute(
            "ALTER TABLE clock_events ADD COLUMN source TEXT NOT NULL DEFAULT 'cli';",
            [],
        )
        .map_err(|e| {
            Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(format!("Failed to add 'source' column: {}", e)),
            )
        })?;
    }

    mark_applied(conn, version, "Added source column to clock_events")?;

    success(format!(
        "Migration applied: {} → added 'source' to clock_events table",
        version
    ));

    Ok(())
}

/// Positions shared outside clock events.
fn migrate_create_locations(conn: &Connection) -> Result<()> {
    let version = "20250415_0003_create_locations";

    if migration_applied(conn, version)? {
        return Ok(());
    }

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS locations (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id      INTEGER NOT NULL REFERENCES users(id),
            lat          REAL NOT NULL,
            lng          REAL NOT NULL,
            accuracy     REAL,
            notes        TEXT,
            recorded_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_locations_user_time
            ON locations(user_id, recorded_at);
        "#,
    )?;

    mark_applied(conn, version, "Created locations table")?;
    success(format!("Migration applied: {} → created locations table", version));

    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::initialize::init_db() and `db --migrate`.
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    if !table_exists(conn, "users")? {
        create_users_table(conn)?;
        success("Created users table.");
    }

    if !table_exists(conn, "clock_events")? {
        create_clock_events_table(conn)?;
        success("Created clock_events table.");
    } else {
        // indexes may be missing on databases created by hand
        create_clock_events_table(conn)?;
    }

    if !table_exists(conn, "daily_totals")? {
        create_daily_totals_table(conn)?;
        success("Created daily_totals table.");
    }

    migrate_add_source_column(conn)?;
    migrate_create_locations(conn)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_pending_migrations(&conn).unwrap();
        run_pending_migrations(&conn).unwrap();

        assert!(table_has_column(&conn, "clock_events", "source").unwrap());
        assert!(table_exists(&conn, "locations").unwrap());

        let applied: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM log WHERE operation = 'migration_applied'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(applied, 2);
    }
}
