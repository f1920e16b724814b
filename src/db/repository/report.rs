use std::str::FromStr;

use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{fmt_dt, parse_dt};
use crate::db::DatabaseError;
use crate::models::{MedicalReport, ReportStatus};

pub fn insert_report(conn: &Connection, report: &MedicalReport) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO medical_reports (id, report_ref, patient_id, report_type, report_date,
         referring_physician, chief_complaint, ai_generated_report, affected_percentage,
         segmentation_image_path, doctor_id, doctor_review, is_edited, edited_at,
         original_file_path, extracted_data, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17,
                 ?18, ?19)",
        params![
            report.id.to_string(),
            report.report_ref,
            report.patient_id.to_string(),
            report.report_type,
            fmt_dt(&report.report_date),
            report.referring_physician,
            report.chief_complaint,
            report.ai_generated_report,
            report.affected_percentage,
            report.segmentation_image_path,
            report.doctor_id.map(|id| id.to_string()),
            report.doctor_review,
            report.is_edited as i32,
            report.edited_at.map(|dt| fmt_dt(&dt)),
            report.original_file_path,
            report.extracted_data.as_ref().map(|v| v.to_string()),
            report.status.as_str(),
            fmt_dt(&report.created_at),
            fmt_dt(&report.updated_at),
        ],
    )?;
    Ok(())
}

/// Update the mutable review/analysis portion of a report.
pub fn update_report(conn: &Connection, report: &MedicalReport) -> Result<(), DatabaseError> {
    let rows = conn.execute(
        "UPDATE medical_reports SET ai_generated_report = ?2, affected_percentage = ?3,
         segmentation_image_path = ?4, doctor_id = ?5, doctor_review = ?6, is_edited = ?7,
         edited_at = ?8, status = ?9, updated_at = ?10
         WHERE id = ?1",
        params![
            report.id.to_string(),
            report.ai_generated_report,
            report.affected_percentage,
            report.segmentation_image_path,
            report.doctor_id.map(|id| id.to_string()),
            report.doctor_review,
            report.is_edited as i32,
            report.edited_at.map(|dt| fmt_dt(&dt)),
            report.status.as_str(),
            fmt_dt(&report.updated_at),
        ],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "MedicalReport".into(),
            id: report.id.to_string(),
        });
    }
    Ok(())
}

pub fn get_report(conn: &Connection, id: &Uuid) -> Result<Option<MedicalReport>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("{SELECT_REPORT} WHERE id = ?1"))?;
    let result = stmt.query_row(params![id.to_string()], map_report_row);
    match result {
        Ok(row) => Ok(Some(report_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_reports_for_patient(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Vec<MedicalReport>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_REPORT} WHERE patient_id = ?1 ORDER BY created_at DESC"
    ))?;
    let rows = stmt.query_map(params![patient_id.to_string()], map_report_row)?;

    let mut reports = Vec::new();
    for row in rows {
        reports.push(report_from_row(row?)?);
    }
    Ok(reports)
}

pub fn count_reports(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM medical_reports", [], |r| r.get(0))?;
    Ok(count)
}

pub fn count_reports_by_status(
    conn: &Connection,
    status: ReportStatus,
) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM medical_reports WHERE status = ?1",
        params![status.as_str()],
        |r| r.get(0),
    )?;
    Ok(count)
}

pub fn recent_reports(conn: &Connection, limit: i64) -> Result<Vec<MedicalReport>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_REPORT} ORDER BY created_at DESC LIMIT ?1"
    ))?;
    let rows = stmt.query_map(params![limit], map_report_row)?;

    let mut reports = Vec::new();
    for row in rows {
        reports.push(report_from_row(row?)?);
    }
    Ok(reports)
}

const SELECT_REPORT: &str = "SELECT id, report_ref, patient_id, report_type, report_date,
     referring_physician, chief_complaint, ai_generated_report, affected_percentage,
     segmentation_image_path, doctor_id, doctor_review, is_edited, edited_at,
     original_file_path, extracted_data, status, created_at, updated_at FROM medical_reports";

struct ReportRow {
    id: String,
    report_ref: String,
    patient_id: String,
    report_type: String,
    report_date: String,
    referring_physician: Option<String>,
    chief_complaint: Option<String>,
    ai_generated_report: Option<String>,
    affected_percentage: Option<f64>,
    segmentation_image_path: Option<String>,
    doctor_id: Option<String>,
    doctor_review: Option<String>,
    is_edited: i32,
    edited_at: Option<String>,
    original_file_path: Option<String>,
    extracted_data: Option<String>,
    status: String,
    created_at: String,
    updated_at: String,
}

fn map_report_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ReportRow> {
    Ok(ReportRow {
        id: row.get(0)?,
        report_ref: row.get(1)?,
        patient_id: row.get(2)?,
        report_type: row.get(3)?,
        report_date: row.get(4)?,
        referring_physician: row.get(5)?,
        chief_complaint: row.get(6)?,
        ai_generated_report: row.get(7)?,
        affected_percentage: row.get(8)?,
        segmentation_image_path: row.get(9)?,
        doctor_id: row.get(10)?,
        doctor_review: row.get(11)?,
        is_edited: row.get(12)?,
        edited_at: row.get(13)?,
        original_file_path: row.get(14)?,
        extracted_data: row.get(15)?,
        status: row.get(16)?,
        created_at: row.get(17)?,
        updated_at: row.get(18)?,
    })
}

fn report_from_row(row: ReportRow) -> Result<MedicalReport, DatabaseError> {
    Ok(MedicalReport {
        id: Uuid::parse_str(&row.id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        report_ref: row.report_ref,
        patient_id: Uuid::parse_str(&row.patient_id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        report_type: row.report_type,
        report_date: parse_dt(&row.report_date),
        referring_physician: row.referring_physician,
        chief_complaint: row.chief_complaint,
        ai_generated_report: row.ai_generated_report,
        affected_percentage: row.affected_percentage,
        segmentation_image_path: row.segmentation_image_path,
        doctor_id: row.doctor_id.and_then(|s| Uuid::parse_str(&s).ok()),
        doctor_review: row.doctor_review,
        is_edited: row.is_edited != 0,
        edited_at: row.edited_at.map(|dt| parse_dt(&dt)),
        original_file_path: row.original_file_path,
        extracted_data: row
            .extracted_data
            .and_then(|raw| serde_json::from_str(&raw).ok()),
        status: ReportStatus::from_str(&row.status)?,
        created_at: parse_dt(&row.created_at),
        updated_at: parse_dt(&row.updated_at),
    })
}
