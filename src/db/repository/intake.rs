use chrono::NaiveDate;
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{fmt_dt, parse_dt};
use crate::db::DatabaseError;
use crate::models::PatientIntake;

pub fn insert_intake(conn: &Connection, intake: &PatientIntake) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO patient_intakes (id, patient_id, age, sex, dob, contact_number,
         national_health_id, previous_condition, current_medication, family_history,
         known_allergy, chief_complaint, referring_doctor, neurological_symptom,
         treatment_history, symptom_progression, report_content, report_file, extracted_data,
         assigned_doctor_id, high_priority, created_by, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17,
                 ?18, ?19, ?20, ?21, ?22, ?23, ?24)",
        params![
            intake.id.to_string(),
            intake.patient_id.to_string(),
            intake.age,
            intake.sex,
            intake.dob.map(|d| d.to_string()),
            intake.contact_number,
            intake.national_health_id,
            intake.previous_condition,
            intake.current_medication,
            intake.family_history,
            intake.known_allergy,
            intake.chief_complaint,
            intake.referring_doctor,
            intake.neurological_symptom,
            intake.treatment_history,
            intake.symptom_progression,
            intake.report_content,
            intake.report_file,
            intake.extracted_data.as_ref().map(|v| v.to_string()),
            intake.assigned_doctor_id.map(|id| id.to_string()),
            intake.high_priority.map(|b| b as i32),
            intake.created_by.to_string(),
            fmt_dt(&intake.created_at),
            fmt_dt(&intake.updated_at),
        ],
    )?;
    Ok(())
}

pub fn get_intake(conn: &Connection, id: &Uuid) -> Result<Option<PatientIntake>, DatabaseError> {
    query_one(conn, "WHERE id = ?1", params![id.to_string()])
}

/// The newest intake for a patient; the record the doctor-facing views show.
pub fn latest_intake_for_patient(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Option<PatientIntake>, DatabaseError> {
    query_one(
        conn,
        "WHERE patient_id = ?1 ORDER BY created_at DESC, rowid DESC LIMIT 1",
        params![patient_id.to_string()],
    )
}

const SELECT_INTAKE: &str = "SELECT id, patient_id, age, sex, dob, contact_number,
     national_health_id, previous_condition, current_medication, family_history, known_allergy,
     chief_complaint, referring_doctor, neurological_symptom, treatment_history,
     symptom_progression, report_content, report_file, extracted_data, assigned_doctor_id,
     high_priority, created_by, created_at, updated_at FROM patient_intakes";

fn query_one(
    conn: &Connection,
    clause: &str,
    params: impl rusqlite::Params,
) -> Result<Option<PatientIntake>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("{SELECT_INTAKE} {clause}"))?;
    let result = stmt.query_row(params, map_intake_row);
    match result {
        Ok(row) => Ok(Some(intake_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

struct IntakeRow {
    id: String,
    patient_id: String,
    age: Option<String>,
    sex: Option<String>,
    dob: Option<String>,
    contact_number: Option<String>,
    national_health_id: Option<String>,
    previous_condition: Option<String>,
    current_medication: Option<String>,
    family_history: Option<String>,
    known_allergy: Option<String>,
    chief_complaint: Option<String>,
    referring_doctor: Option<String>,
    neurological_symptom: Option<String>,
    treatment_history: Option<String>,
    symptom_progression: Option<String>,
    report_content: Option<String>,
    report_file: Option<String>,
    extracted_data: Option<String>,
    assigned_doctor_id: Option<String>,
    high_priority: Option<i32>,
    created_by: String,
    created_at: String,
    updated_at: String,
}

fn map_intake_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<IntakeRow> {
    Ok(IntakeRow {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        age: row.get(2)?,
        sex: row.get(3)?,
        dob: row.get(4)?,
        contact_number: row.get(5)?,
        national_health_id: row.get(6)?,
        previous_condition: row.get(7)?,
        current_medication: row.get(8)?,
        family_history: row.get(9)?,
        known_allergy: row.get(10)?,
        chief_complaint: row.get(11)?,
        referring_doctor: row.get(12)?,
        neurological_symptom: row.get(13)?,
        treatment_history: row.get(14)?,
        symptom_progression: row.get(15)?,
        report_content: row.get(16)?,
        report_file: row.get(17)?,
        extracted_data: row.get(18)?,
        assigned_doctor_id: row.get(19)?,
        high_priority: row.get(20)?,
        created_by: row.get(21)?,
        created_at: row.get(22)?,
        updated_at: row.get(23)?,
    })
}

fn intake_from_row(row: IntakeRow) -> Result<PatientIntake, DatabaseError> {
    Ok(PatientIntake {
        id: Uuid::parse_str(&row.id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        patient_id: Uuid::parse_str(&row.patient_id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        age: row.age,
        sex: row.sex,
        dob: row
            .dob
            .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        contact_number: row.contact_number,
        national_health_id: row.national_health_id,
        previous_condition: row.previous_condition,
        current_medication: row.current_medication,
        family_history: row.family_history,
        known_allergy: row.known_allergy,
        chief_complaint: row.chief_complaint,
        referring_doctor: row.referring_doctor,
        neurological_symptom: row.neurological_symptom,
        treatment_history: row.treatment_history,
        symptom_progression: row.symptom_progression,
        report_content: row.report_content,
        report_file: row.report_file,
        extracted_data: row
            .extracted_data
            .and_then(|raw| serde_json::from_str(&raw).ok()),
        assigned_doctor_id: row
            .assigned_doctor_id
            .and_then(|s| Uuid::parse_str(&s).ok()),
        high_priority: row.high_priority.map(|v| v != 0),
        created_by: Uuid::parse_str(&row.created_by)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        created_at: parse_dt(&row.created_at),
        updated_at: parse_dt(&row.updated_at),
    })
}
