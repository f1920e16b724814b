//! Medical report lifecycle: created at intake, enriched with AI analysis,
//! reviewed by doctors, compared via the LLM service.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::endpoints::{lock_db, patient_json, report_json, require_role};
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, AuthedUser};
use crate::db::repository::{
    get_patient, get_report, get_reports_for_patient, insert_report, update_report,
};
use crate::models::{generate_report_ref, MedicalReport, ReportStatus, Role};

#[derive(Deserialize)]
pub struct CreateReportRequest {
    pub patient_id: Uuid,
    #[serde(default)]
    pub report_type: String,
    pub referring_physician: Option<String>,
    pub chief_complaint: Option<String>,
    pub original_file_path: Option<String>,
    pub extracted_data: Option<Value>,
}

/// `POST /api/reports` — create a pending report (receptionist only).
pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<AuthedUser>,
    Json(payload): Json<CreateReportRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_role(&user, Role::Receptionist)?;

    if payload.report_type.trim().is_empty() {
        return Err(ApiError::BadRequest("Missing required field: report_type".into()));
    }

    let now = Utc::now().naive_utc();
    let conn = lock_db(&ctx)?;

    if get_patient(&conn, &payload.patient_id)?.is_none() {
        return Err(ApiError::NotFound("Patient not found".into()));
    }

    let report = MedicalReport {
        id: Uuid::new_v4(),
        report_ref: generate_report_ref(),
        patient_id: payload.patient_id,
        report_type: payload.report_type.trim().to_string(),
        report_date: now,
        referring_physician: payload.referring_physician,
        chief_complaint: payload.chief_complaint,
        ai_generated_report: None,
        affected_percentage: None,
        segmentation_image_path: None,
        doctor_id: None,
        doctor_review: None,
        is_edited: false,
        edited_at: None,
        original_file_path: payload.original_file_path,
        extracted_data: payload.extracted_data,
        status: ReportStatus::Pending,
        created_at: now,
        updated_at: now,
    };
    insert_report(&conn, &report)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Medical report created successfully",
            "report": report_json(&report),
        })),
    ))
}

#[derive(Deserialize)]
pub struct UpdateReportRequest {
    pub doctor_review: Option<String>,
    pub ai_generated_report: Option<String>,
    pub affected_percentage: Option<f64>,
    pub segmentation_image_path: Option<String>,
}

/// `PUT /api/reports/:id` — attach AI results / doctor review (doctor only).
pub async fn update(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<AuthedUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateReportRequest>,
) -> Result<Json<Value>, ApiError> {
    require_role(&user, Role::Doctor)?;

    let now = Utc::now().naive_utc();
    let conn = lock_db(&ctx)?;
    let mut report =
        get_report(&conn, &id)?.ok_or_else(|| ApiError::NotFound("Report not found".into()))?;

    if let Some(review) = payload.doctor_review {
        report.doctor_review = Some(review);
        report.is_edited = true;
        report.edited_at = Some(now);
        report.doctor_id = Some(user.id);
        report.status = ReportStatus::DoctorReviewed;
    }
    if let Some(ai_report) = payload.ai_generated_report {
        report.ai_generated_report = Some(ai_report);
        if report.status == ReportStatus::Pending {
            report.status = ReportStatus::AiProcessed;
        }
    }
    if let Some(percentage) = payload.affected_percentage {
        report.affected_percentage = Some(percentage);
    }
    if let Some(path) = payload.segmentation_image_path {
        report.segmentation_image_path = Some(path);
    }
    report.updated_at = now;

    update_report(&conn, &report)?;

    Ok(Json(json!({
        "success": true,
        "message": "Report updated successfully",
        "report": report_json(&report),
    })))
}

/// `GET /api/reports/:id` — one report with its patient.
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let conn = lock_db(&ctx)?;
    let report =
        get_report(&conn, &id)?.ok_or_else(|| ApiError::NotFound("Report not found".into()))?;
    let patient = get_patient(&conn, &report.patient_id)?;

    let mut report_data = report_json(&report);
    report_data["patient"] = patient.as_ref().map(patient_json).unwrap_or(Value::Null);

    Ok(Json(json!({ "success": true, "report": report_data })))
}

/// `GET /api/reports/patient/:patient_id` — all reports for one patient.
pub async fn for_patient(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let conn = lock_db(&ctx)?;
    let reports = get_reports_for_patient(&conn, &patient_id)?;
    Ok(Json(json!({
        "success": true,
        "reports": reports.iter().map(report_json).collect::<Vec<_>>(),
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareRequest {
    #[serde(default)]
    pub old_report: String,
    #[serde(default)]
    pub new_report: String,
}

/// `POST /api/reports/compare` — LLM comparison of two report texts
/// (doctor only). A failed LLM call surfaces as a retryable 502.
pub async fn compare(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<AuthedUser>,
    Json(payload): Json<CompareRequest>,
) -> Result<Json<Value>, ApiError> {
    require_role(&user, Role::Doctor)?;

    if payload.old_report.trim().is_empty() || payload.new_report.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Both reports are required for comparison".into(),
        ));
    }

    let comparison = ctx
        .narrative
        .compare_reports(&payload.old_report, &payload.new_report)
        .await?;

    Ok(Json(json!({
        "success": true,
        "comparison": comparison.comparison,
        "statistics": comparison.statistics,
    })))
}
