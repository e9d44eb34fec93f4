//! Student registry: the directory the ledger checks user existence against.

use crate::errors::{AppError, AppResult};
use crate::models::user::{NewUser, User};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, params};

fn map_user(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        student_code: row.get("student_code")?,
        email: row.get("email")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        created_at: row.get("created_at")?,
    })
}

pub fn insert_user(conn: &Connection, user: &NewUser) -> AppResult<i64> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO users (student_code, email, first_name, last_name, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;

    let res = stmt.execute(params![
        user.student_code,
        user.email.to_lowercase(),
        user.first_name,
        user.last_name,
        Utc::now().to_rfc3339(),
    ]);

    match res {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(AppError::Conflict(format!(
                "a student with code '{}' or email '{}' already exists",
                user.student_code, user.email
            )))
        }
        Err(e) => Err(e.into()),
    }
}

pub fn user_exists(conn: &Connection, user_id: i64) -> AppResult<bool> {
    let mut stmt = conn.prepare_cached("SELECT 1 FROM users WHERE id = ?1")?;
    Ok(stmt.exists([user_id])?)
}

pub fn find_by_code(conn: &Connection, student_code: &str) -> AppResult<Option<User>> {
    let mut stmt = conn.prepare_cached("SELECT * FROM users WHERE student_code = ?1")?;
    Ok(stmt.query_row([student_code], map_user).optional()?)
}

/// Resolve a student code, failing with NotFound when unknown.
pub fn require_by_code(conn: &Connection, student_code: &str) -> AppResult<User> {
    find_by_code(conn, student_code)?
        .ok_or_else(|| AppError::NotFound(format!("no student with code '{}'", student_code)))
}

pub fn list_users(conn: &Connection) -> AppResult<Vec<User>> {
    let mut stmt = conn.prepare_cached("SELECT * FROM users ORDER BY student_code ASC")?;
    let rows = stmt.query_map([], map_user)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
