use std::str::FromStr;

use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{fmt_dt, parse_dt};
use crate::db::DatabaseError;
use crate::models::{Role, User};

pub fn insert_user(conn: &Connection, user: &User) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO users (id, email, full_name, password_hash, role, specialty, department,
         is_active, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            user.id.to_string(),
            user.email.to_lowercase(),
            user.full_name,
            user.password_hash,
            user.role.as_str(),
            user.specialty,
            user.department,
            user.is_active as i32,
            fmt_dt(&user.created_at),
            fmt_dt(&user.updated_at),
        ],
    )?;
    Ok(())
}

pub fn get_user(conn: &Connection, id: &Uuid) -> Result<Option<User>, DatabaseError> {
    query_one(conn, "WHERE id = ?1", params![id.to_string()])
}

pub fn get_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>, DatabaseError> {
    query_one(conn, "WHERE email = ?1", params![email.trim().to_lowercase()])
}

/// Active doctors, for the roster endpoints.
pub fn list_active_doctors(conn: &Connection) -> Result<Vec<User>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_USER} WHERE role = 'doctor' AND is_active = 1 ORDER BY full_name"
    ))?;
    let rows = stmt.query_map([], map_user_row)?;

    let mut users = Vec::new();
    for row in rows {
        users.push(user_from_row(row?)?);
    }
    Ok(users)
}

/// (active, total) doctor counts.
pub fn count_doctors(conn: &Connection) -> Result<(i64, i64), DatabaseError> {
    let active = conn.query_row(
        "SELECT COUNT(*) FROM users WHERE role = 'doctor' AND is_active = 1",
        [],
        |r| r.get(0),
    )?;
    let total = conn.query_row("SELECT COUNT(*) FROM users WHERE role = 'doctor'", [], |r| {
        r.get(0)
    })?;
    Ok((active, total))
}

pub fn count_users(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))?;
    Ok(count)
}

const SELECT_USER: &str = "SELECT id, email, full_name, password_hash, role, specialty,
     department, is_active, created_at, updated_at FROM users";

fn query_one(
    conn: &Connection,
    clause: &str,
    params: impl rusqlite::Params,
) -> Result<Option<User>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("{SELECT_USER} {clause}"))?;
    let result = stmt.query_row(params, map_user_row);
    match result {
        Ok(row) => Ok(Some(user_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

struct UserRow {
    id: String,
    email: String,
    full_name: String,
    password_hash: String,
    role: String,
    specialty: Option<String>,
    department: Option<String>,
    is_active: i32,
    created_at: String,
    updated_at: String,
}

fn map_user_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        email: row.get(1)?,
        full_name: row.get(2)?,
        password_hash: row.get(3)?,
        role: row.get(4)?,
        specialty: row.get(5)?,
        department: row.get(6)?,
        is_active: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

fn user_from_row(row: UserRow) -> Result<User, DatabaseError> {
    Ok(User {
        id: Uuid::parse_str(&row.id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        email: row.email,
        full_name: row.full_name,
        password_hash: row.password_hash,
        role: Role::from_str(&row.role)?,
        specialty: row.specialty,
        department: row.department,
        is_active: row.is_active != 0,
        created_at: parse_dt(&row.created_at),
        updated_at: parse_dt(&row.updated_at),
    })
}
