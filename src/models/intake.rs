use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A receptionist-collected intake record: demographics plus clinical
/// history, created before any doctor interaction. Field values may come
/// from the extraction pipeline or hand-editing; either way they are plain
/// strings by the time they land here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientIntake {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub age: Option<String>,
    pub sex: Option<String>,
    pub dob: Option<NaiveDate>,
    pub contact_number: Option<String>,
    pub national_health_id: Option<String>,
    pub previous_condition: Option<String>,
    pub current_medication: Option<String>,
    pub family_history: Option<String>,
    pub known_allergy: Option<String>,
    pub chief_complaint: Option<String>,
    pub referring_doctor: Option<String>,
    pub neurological_symptom: Option<String>,
    pub treatment_history: Option<String>,
    pub symptom_progression: Option<String>,
    pub report_content: Option<String>,
    /// Path of the stored uploaded report, when one was attached.
    pub report_file: Option<String>,
    /// Raw extraction output kept for audit/re-review.
    pub extracted_data: Option<serde_json::Value>,
    pub assigned_doctor_id: Option<Uuid>,
    /// Explicit triage override; when set it wins over recomputation.
    pub high_priority: Option<bool>,
    pub created_by: Uuid,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
