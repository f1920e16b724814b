//! Patient CRUD and search.

use axum::extract::{Path, Query, State};
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
    get_patient, get_patient_by_ref, get_reports_for_patient, insert_patient,
    latest_intake_for_patient, search_patients,
};
use crate::models::{generate_patient_ref, Patient, Role};

#[derive(Deserialize)]
pub struct CreatePatientRequest {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub gender: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub blood_group: Option<String>,
    pub known_allergies: Option<String>,
    pub medical_history: Option<String>,
    pub current_medications: Option<String>,
    pub family_history: Option<String>,
}

/// `POST /api/patients` — register a patient (receptionist only).
pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<AuthedUser>,
    Json(payload): Json<CreatePatientRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_role(&user, Role::Receptionist)?;

    for (field, value) in [
        ("first_name", &payload.first_name),
        ("last_name", &payload.last_name),
        ("date_of_birth", &payload.date_of_birth),
        ("gender", &payload.gender),
    ] {
        if value.trim().is_empty() {
            return Err(ApiError::BadRequest(format!("Missing required field: {field}")));
        }
    }

    let date_of_birth = NaiveDate::parse_from_str(&payload.date_of_birth, "%Y-%m-%d")
        .map_err(|_| {
            ApiError::BadRequest(format!(
                "Invalid date format: {}. Please use YYYY-MM-DD format.",
                payload.date_of_birth
            ))
        })?;

    let now = Utc::now().naive_utc();
    let patient = Patient {
        id: Uuid::new_v4(),
        patient_ref: generate_patient_ref(),
        first_name: payload.first_name.trim().to_string(),
        last_name: payload.last_name.trim().to_string(),
        date_of_birth,
        gender: payload.gender,
        phone: payload.phone,
        email: payload.email,
        address: payload.address,
        blood_group: payload.blood_group,
        known_allergies: payload.known_allergies,
        medical_history: payload.medical_history,
        current_medications: payload.current_medications,
        family_history: payload.family_history,
        registered_by: user.id,
        created_at: now,
        updated_at: now,
    };

    let conn = lock_db(&ctx)?;
    insert_patient(&conn, &patient)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Patient created successfully",
            "patient": patient_json(&patient),
        })),
    ))
}

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_per_page")]
    pub per_page: i64,
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    20
}

/// `GET /api/patients` — list/search with pagination.
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    let per_page = query.per_page.clamp(1, 100);
    let page = query.page.max(1);

    let conn = lock_db(&ctx)?;
    let (patients, total) = search_patients(&conn, &query.search, page, per_page)?;

    let pages = (total + per_page - 1) / per_page;
    Ok(Json(json!({
        "success": true,
        "patients": patients.iter().map(patient_json).collect::<Vec<_>>(),
        "total": total,
        "pages": pages,
        "current_page": page,
    })))
}

/// `GET /api/patients/:id` — one patient with their reports.
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let conn = lock_db(&ctx)?;
    let patient = get_patient(&conn, &id)?
        .ok_or_else(|| ApiError::NotFound("Patient not found".into()))?;
    let reports = get_reports_for_patient(&conn, &patient.id)?;

    let mut patient_data = patient_json(&patient);
    patient_data["medical_reports"] = reports.iter().map(report_json).collect::<Vec<_>>().into();

    Ok(Json(json!({ "success": true, "patient": patient_data })))
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub patient_id: Option<String>,
}

/// `GET /api/patients/search?patient_id=PAT-...` — doctor-side lookup by
/// the human-facing ref, with intake and reports attached.
pub async fn search_by_ref(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<AuthedUser>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Value>, ApiError> {
    require_role(&user, Role::Doctor)?;

    let patient_ref = query
        .patient_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Patient ID is required".into()))?;

    let conn = lock_db(&ctx)?;
    let patient = get_patient_by_ref(&conn, patient_ref)?
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
