//! Patient intake: the receptionist-side entry point that creates the
//! patient and the intake record in one step, usually pre-filled by the
//! extraction pipeline.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::endpoints::{intake_json, lock_db, patient_json, report_json, require_role};
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, AuthedUser};
use crate::db::repository::{
    get_patient, get_reports_for_patient, insert_intake, insert_patient,
    latest_intake_for_patient,
};
use crate::models::{generate_patient_ref, Patient, PatientIntake, Role};

/// Intake payload, camelCase as the intake form submits it.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntakeRequest {
    #[serde(default)]
    pub patient_name: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub contact_number: String,
    pub sex: Option<String>,
    pub dob: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
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
    pub previous_report_file: Option<String>,
    pub extracted_data: Option<Value>,
    pub assigned_doctor_id: Option<Uuid>,
    pub high_priority: Option<bool>,
}

/// `POST /api/intake` — create patient + intake (receptionist only).
pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<AuthedUser>,
    Json(payload): Json<CreateIntakeRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_role(&user, Role::Receptionist)?;

    for (field, value) in [
        ("patientName", &payload.patient_name),
        ("age", &payload.age),
        ("contactNumber", &payload.contact_number),
    ] {
        if value.trim().is_empty() {
            return Err(ApiError::BadRequest(format!("Missing required field: {field}")));
        }
    }

    let dob = match payload.dob.as_deref().filter(|d| !d.trim().is_empty()) {
        Some(raw) => Some(NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
            ApiError::BadRequest(format!(
                "Invalid date format: {raw}. Please use YYYY-MM-DD format."
            ))
        })?),
        None => None,
    };

    let (first_name, last_name) = split_name(&payload.patient_name);
    let now = Utc::now().naive_utc();

    let patient = Patient {
        id: Uuid::new_v4(),
        patient_ref: generate_patient_ref(),
        first_name,
        last_name,
        date_of_birth: dob.unwrap_or_else(|| Utc::now().date_naive()),
        gender: payload.sex.clone().unwrap_or_else(|| "Unknown".into()),
        phone: Some(payload.contact_number.trim().to_string()),
        email: payload.email.clone(),
        address: payload.address.clone(),
        blood_group: None,
        known_allergies: payload.known_allergy.clone(),
        medical_history: payload.previous_condition.clone(),
        current_medications: payload.current_medication.clone(),
        family_history: payload.family_history.clone(),
        registered_by: user.id,
        created_at: now,
        updated_at: now,
    };

    let intake = PatientIntake {
        id: Uuid::new_v4(),
        patient_id: patient.id,
        age: Some(payload.age.trim().to_string()),
        sex: payload.sex,
        dob,
        contact_number: Some(payload.contact_number.trim().to_string()),
        national_health_id: payload.national_health_id,
        previous_condition: payload.previous_condition,
        current_medication: payload.current_medication,
        family_history: payload.family_history,
        known_allergy: payload.known_allergy,
        chief_complaint: payload.chief_complaint,
        referring_doctor: payload.referring_doctor,
        neurological_symptom: payload.neurological_symptom,
        treatment_history: payload.treatment_history,
        symptom_progression: payload.symptom_progression,
        report_content: payload.report_content,
        report_file: payload.previous_report_file,
        extracted_data: payload.extracted_data,
        assigned_doctor_id: payload.assigned_doctor_id,
        high_priority: payload.high_priority,
        created_by: user.id,
        created_at: now,
        updated_at: now,
    };

    let conn = lock_db(&ctx)?;
    insert_patient(&conn, &patient)?;
    insert_intake(&conn, &intake)?;

    tracing::info!(
        patient_ref = %patient.patient_ref,
        by = %user.email,
        "patient intake created"
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Patient intake created successfully",
            "patient": patient_json(&patient),
            "intake": intake_json(&intake, &ctx.config.triage),
        })),
    ))
}

/// `GET /api/intake/:patient_id` — patient with latest intake and reports.
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let conn = lock_db(&ctx)?;
    let patient = get_patient(&conn, &patient_id)?
        .ok_or_else(|| ApiError::NotFound("Patient not found".into()))?;

    let intake = latest_intake_for_patient(&conn, &patient.id)?;
    let reports = get_reports_for_patient(&conn, &patient.id)?;

    let mut patient_data = patient_json(&patient);
    patient_data["intake"] = intake
        .as_ref()
        .map(|i| intake_json(i, &ctx.config.triage))
        .unwrap_or(Value::Null);
    patient_data["medical_reports"] = reports.iter().map(report_json).collect::<Vec<_>>().into();

    Ok(Json(json!({ "success": true, "patient": patient_data })))
}

fn split_name(full: &str) -> (String, String) {
    let trimmed = full.trim();
    match trimmed.split_once(' ') {
        Some((first, rest)) => (first.to_string(), rest.trim().to_string()),
        None => (trimmed.to_string(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_name_handles_single_and_multi_word() {
        assert_eq!(split_name("Jane Doe"), ("Jane".into(), "Doe".into()));
        assert_eq!(split_name("Cher"), ("Cher".into(), String::new()));
        assert_eq!(
            split_name("Mary Jane Watson"),
            ("Mary".into(), "Jane Watson".into())
        );
        assert_eq!(split_name("  Jane  "), ("Jane".into(), String::new()));
    }
}
