pub mod auth;
pub mod dashboard;
pub mod export;
pub mod health;
pub mod intake;
pub mod patients;
pub mod reports;
pub mod segment;
pub mod upload;

use std::sync::MutexGuard;

use rusqlite::Connection;
use serde_json::{json, Value};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, AuthedUser};
use crate::models::{MedicalReport, Patient, PatientIntake, Role};
use crate::triage::{self, TriageConfig, TriageInput};

/// Handler-side role gate.
pub(crate) fn require_role(user: &AuthedUser, role: Role) -> Result<(), ApiError> {
    if user.role == role {
        Ok(())
    } else {
        let label = match role {
            Role::Doctor => "Doctor",
            Role::Receptionist => "Receptionist",
        };
        Err(ApiError::Forbidden(format!("{label} access required")))
    }
}

pub(crate) fn lock_db(ctx: &ApiContext) -> Result<MutexGuard<'_, Connection>, ApiError> {
    ctx.db.lock().map_err(|_| ApiError::Internal("db lock".into()))
}

/// Patient wire shape: the stored record plus the computed full name.
pub(crate) fn patient_json(patient: &Patient) -> Value {
    json!({
        "id": patient.id,
        "patient_id": patient.patient_ref,
        "first_name": patient.first_name,
        "last_name": patient.last_name,
        "full_name": patient.full_name(),
        "date_of_birth": patient.date_of_birth.to_string(),
        "gender": patient.gender,
        "phone": patient.phone,
        "email": patient.email,
        "address": patient.address,
        "blood_group": patient.blood_group,
        "known_allergies": patient.known_allergies,
        "medical_history": patient.medical_history,
        "current_medications": patient.current_medications,
        "family_history": patient.family_history,
        "registered_by": patient.registered_by,
        "registration_date": patient.created_at.to_string(),
        "updated_at": patient.updated_at.to_string(),
    })
}

/// Intake wire shape. Triage is recomputed on every render; a stored
/// explicit flag takes precedence inside the classifier.
pub(crate) fn intake_json(intake: &PatientIntake, triage_config: &TriageConfig) -> Value {
    let assessment = triage::assess(
        TriageInput {
            preset: intake.high_priority,
            age: intake.age.as_deref(),
            chief_complaint: intake.chief_complaint.as_deref(),
            previous_condition: intake.previous_condition.as_deref(),
        },
        triage_config,
    );

    json!({
        "id": intake.id,
        "patient_id": intake.patient_id,
        "age": intake.age,
        "sex": intake.sex,
        "dob": intake.dob.map(|d| d.to_string()),
        "contact_number": intake.contact_number,
        "national_health_id": intake.national_health_id,
        "previous_condition": intake.previous_condition,
        "current_medication": intake.current_medication,
        "family_history": intake.family_history,
        "known_allergy": intake.known_allergy,
        "chief_complaint": intake.chief_complaint,
        "referring_doctor": intake.referring_doctor,
        "neurological_symptom": intake.neurological_symptom,
        "treatment_history": intake.treatment_history,
        "symptom_progression": intake.symptom_progression,
        "report_content": intake.report_content,
        "report_file": intake.report_file,
        "extracted_data": intake.extracted_data,
        "assigned_doctor_id": intake.assigned_doctor_id,
        "high_priority": assessment.high_priority,
        "priority_reason": assessment.reason,
        "created_by": intake.created_by,
        "created_at": intake.created_at.to_string(),
        "updated_at": intake.updated_at.to_string(),
    })
}

pub(crate) fn report_json(report: &MedicalReport) -> Value {
    json!({
        "id": report.id,
        "report_id": report.report_ref,
        "patient_id": report.patient_id,
        "report_type": report.report_type,
        "report_date": report.report_date.to_string(),
        "referring_physician": report.referring_physician,
        "chief_complaint": report.chief_complaint,
        "ai_generated_report": report.ai_generated_report,
        "affected_percentage": report.affected_percentage,
        "segmentation_image_path": report.segmentation_image_path,
        "doctor_id": report.doctor_id,
        "doctor_review": report.doctor_review,
        "is_edited": report.is_edited,
        "edited_at": report.edited_at.map(|dt| dt.to_string()),
        "original_file_path": report.original_file_path,
        "extracted_data": report.extracted_data,
        "status": report.status.as_str(),
        "created_at": report.created_at.to_string(),
        "updated_at": report.updated_at.to_string(),
    })
}
