use std::str::FromStr;

use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{fmt_dt, parse_dt};
use crate::db::DatabaseError;
use crate::models::Role;

/// One server-side auth session. The cookie carries the raw token; only its
/// hash is stored here.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token_hash: String,
    pub user_id: Uuid,
    pub role: Role,
    pub created_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
}

pub fn insert_session(
    conn: &Connection,
    token_hash: &str,
    user_id: &Uuid,
    role: Role,
    expires_at: &NaiveDateTime,
) -> Result<(), DatabaseError> {
    let now = chrono::Utc::now().naive_utc();
    conn.execute(
        "INSERT INTO auth_sessions (token_hash, user_id, role, created_at, expires_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            token_hash,
            user_id.to_string(),
            role.as_str(),
            fmt_dt(&now),
            fmt_dt(expires_at),
        ],
    )?;
    Ok(())
}

pub fn get_session(conn: &Connection, token_hash: &str) -> Result<Option<AuthSession>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT token_hash, user_id, role, created_at, expires_at
         FROM auth_sessions WHERE token_hash = ?1",
    )?;

    let result = stmt.query_row(params![token_hash], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
        ))
    });

    match result {
        Ok((hash, user_id, role, created_at, expires_at)) => Ok(Some(AuthSession {
            token_hash: hash,
            user_id: Uuid::parse_str(&user_id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            role: Role::from_str(&role)?,
            created_at: parse_dt(&created_at),
            expires_at: parse_dt(&expires_at),
        })),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn delete_session(conn: &Connection, token_hash: &str) -> Result<(), DatabaseError> {
    conn.execute(
        "DELETE FROM auth_sessions WHERE token_hash = ?1",
        params![token_hash],
    )?;
    Ok(())
}

/// Sweep sessions past their expiry. Returns how many were removed.
pub fn delete_expired_sessions(
    conn: &Connection,
    now: &NaiveDateTime,
) -> Result<usize, DatabaseError> {
    let removed = conn.execute(
        "DELETE FROM auth_sessions WHERE expires_at < ?1",
        params![fmt_dt(now)],
    )?;
    Ok(removed)
}
