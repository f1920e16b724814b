use chrono::NaiveDate;
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{fmt_dt, parse_dt};
use crate::db::DatabaseError;
use crate::models::Patient;

pub fn insert_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO patients (id, patient_ref, first_name, last_name, date_of_birth, gender,
         phone, email, address, blood_group, known_allergies, medical_history,
         current_medications, family_history, registered_by, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
        params![
            patient.id.to_string(),
            patient.patient_ref,
            patient.first_name,
            patient.last_name,
            patient.date_of_birth.to_string(),
            patient.gender,
            patient.phone,
            patient.email,
            patient.address,
            patient.blood_group,
            patient.known_allergies,
            patient.medical_history,
            patient.current_medications,
            patient.family_history,
            patient.registered_by.to_string(),
            fmt_dt(&patient.created_at),
            fmt_dt(&patient.updated_at),
        ],
    )?;
    Ok(())
}

pub fn get_patient(conn: &Connection, id: &Uuid) -> Result<Option<Patient>, DatabaseError> {
    query_one(conn, "WHERE id = ?1", params![id.to_string()])
}

pub fn get_patient_by_ref(
    conn: &Connection,
    patient_ref: &str,
) -> Result<Option<Patient>, DatabaseError> {
    query_one(conn, "WHERE patient_ref = ?1", params![patient_ref])
}

/// Search over ref, names, and phone; newest first, paginated.
/// Returns the page plus the total match count.
pub fn search_patients(
    conn: &Connection,
    search: &str,
    page: i64,
    per_page: i64,
) -> Result<(Vec<Patient>, i64), DatabaseError> {
    let term = format!("%{}%", search.trim());
    let offset = (page.max(1) - 1) * per_page;

    let total: i64 = conn.query_row(
        "SELECT COUNT(*) FROM patients
         WHERE patient_ref LIKE ?1 OR first_name LIKE ?1 OR last_name LIKE ?1 OR phone LIKE ?1",
        params![term],
        |r| r.get(0),
    )?;

    let mut stmt = conn.prepare(&format!(
        "{SELECT_PATIENT}
         WHERE patient_ref LIKE ?1 OR first_name LIKE ?1 OR last_name LIKE ?1 OR phone LIKE ?1
         ORDER BY created_at DESC LIMIT ?2 OFFSET ?3"
    ))?;
    let rows = stmt.query_map(params![term, per_page, offset], map_patient_row)?;

    let mut patients = Vec::new();
    for row in rows {
        patients.push(patient_from_row(row?)?);
    }
    Ok((patients, total))
}

pub fn count_patients(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM patients", [], |r| r.get(0))?;
    Ok(count)
}

pub fn recent_patients(conn: &Connection, limit: i64) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_PATIENT} ORDER BY created_at DESC LIMIT ?1"
    ))?;
    let rows = stmt.query_map(params![limit], map_patient_row)?;

    let mut patients = Vec::new();
    for row in rows {
        patients.push(patient_from_row(row?)?);
    }
    Ok(patients)
}

const SELECT_PATIENT: &str = "SELECT id, patient_ref, first_name, last_name, date_of_birth,
     gender, phone, email, address, blood_group, known_allergies, medical_history,
     current_medications, family_history, registered_by, created_at, updated_at FROM patients";

fn query_one(
    conn: &Connection,
    clause: &str,
    params: impl rusqlite::Params,
) -> Result<Option<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("{SELECT_PATIENT} {clause}"))?;
    let result = stmt.query_row(params, map_patient_row);
    match result {
        Ok(row) => Ok(Some(patient_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

struct PatientRow {
    id: String,
    patient_ref: String,
    first_name: String,
    last_name: String,
    date_of_birth: String,
    gender: String,
    phone: Option<String>,
    email: Option<String>,
    address: Option<String>,
    blood_group: Option<String>,
    known_allergies: Option<String>,
    medical_history: Option<String>,
    current_medications: Option<String>,
    family_history: Option<String>,
    registered_by: String,
    created_at: String,
    updated_at: String,
}

fn map_patient_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PatientRow> {
    Ok(PatientRow {
        id: row.get(0)?,
        patient_ref: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        date_of_birth: row.get(4)?,
        gender: row.get(5)?,
        phone: row.get(6)?,
        email: row.get(7)?,
        address: row.get(8)?,
        blood_group: row.get(9)?,
        known_allergies: row.get(10)?,
        medical_history: row.get(11)?,
        current_medications: row.get(12)?,
        family_history: row.get(13)?,
        registered_by: row.get(14)?,
        created_at: row.get(15)?,
        updated_at: row.get(16)?,
    })
}

fn patient_from_row(row: PatientRow) -> Result<Patient, DatabaseError> {
    Ok(Patient {
        id: Uuid::parse_str(&row.id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        patient_ref: row.patient_ref,
        first_name: row.first_name,
        last_name: row.last_name,
        date_of_birth: NaiveDate::parse_from_str(&row.date_of_birth, "%Y-%m-%d")
            .unwrap_or_default(),
        gender: row.gender,
        phone: row.phone,
        email: row.email,
        address: row.address,
        blood_group: row.blood_group,
        known_allergies: row.known_allergies,
        medical_history: row.medical_history,
        current_medications: row.current_medications,
        family_history: row.family_history,
        registered_by: Uuid::parse_str(&row.registered_by)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        created_at: parse_dt(&row.created_at),
        updated_at: parse_dt(&row.updated_at),
    })
}
