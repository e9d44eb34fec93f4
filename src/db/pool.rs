//! SQLite connection wrapper (lightweight for CLI usage).

use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, Result, Transaction, TransactionBehavior};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

pub struct DbPool {
    pub conn: Connection,
}

impl DbPool {
    pub fn new(path: &str) -> Result<Self> {
        Self::with_busy_timeout(path, DEFAULT_BUSY_TIMEOUT_MS)
    }

    /// Open `path`; a concurrent writer waits up to `busy_ms` for the lock.
    pub fn with_busy_timeout(path: &str, busy_ms: u64) -> Result<Self> {
        let conn = Connection::open(Path::new(path))?;
        Self::prepare(conn, busy_ms)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::prepare(Connection::open_in_memory()?, DEFAULT_BUSY_TIMEOUT_MS)
    }

    fn prepare(conn: Connection, busy_ms: u64) -> Result<Self> {
        conn.busy_timeout(Duration::from_millis(busy_ms))?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self { conn })
    }

    /// Run `func` as one unit of work.
    ///
    /// The transaction is opened with `BEGIN IMMEDIATE`, so the write lock is
    /// held from the first read: two writers can never both observe the same
    /// state and act on it. Commits when `func` returns `Ok`; any error drops
    /// the transaction, which rolls everything back.
    pub fn unit_of_work<F, T>(&mut self, func: F) -> AppResult<T>
    where
        F: FnOnce(&Transaction<'_>) -> AppResult<T>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let out = func(&tx)?;
        tx.commit().map_err(AppError::from)?;
        Ok(out)
    }
}
