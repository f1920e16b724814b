use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::ReportStatus;
use super::patient::short_unique_suffix;

/// An imaging report: created at intake, enriched by the segmentation
/// service, reviewed and possibly edited by a doctor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalReport {
    pub id: Uuid,
    pub report_ref: String,
    pub patient_id: Uuid,
    pub report_type: String,
    pub report_date: NaiveDateTime,
    pub referring_physician: Option<String>,
    pub chief_complaint: Option<String>,
    pub ai_generated_report: Option<String>,
    pub affected_percentage: Option<f64>,
    pub segmentation_image_path: Option<String>,
    pub doctor_id: Option<Uuid>,
    pub doctor_review: Option<String>,
    pub is_edited: bool,
    pub edited_at: Option<NaiveDateTime>,
    pub original_file_path: Option<String>,
    pub extracted_data: Option<serde_json::Value>,
    pub status: ReportStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Generate a unique human-facing report identifier,
/// e.g. `RPT-20250806-9C01B7AD`.
pub fn generate_report_ref() -> String {
    format!(
        "RPT-{}-{}",
        Utc::now().format("%Y%m%d"),
        short_unique_suffix()
    )
}
