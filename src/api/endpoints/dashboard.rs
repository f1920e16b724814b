//! Dashboard statistics for the landing views.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::api::endpoints::{lock_db, patient_json, report_json};
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository::{
    count_patients, count_reports, count_reports_by_status, recent_patients, recent_reports,
};
use crate::models::ReportStatus;

/// `GET /api/dashboard/stats`
pub async fn stats(State(ctx): State<ApiContext>) -> Result<Json<Value>, ApiError> {
    let conn = lock_db(&ctx)?;

    let total_patients = count_patients(&conn)?;
    let total_reports = count_reports(&conn)?;
    let pending = count_reports_by_status(&conn, ReportStatus::Pending)?;
    let processed = count_reports_by_status(&conn, ReportStatus::AiProcessed)?;
    let reviewed = count_reports_by_status(&conn, ReportStatus::DoctorReviewed)?;

    let recent_patients = recent_patients(&conn, 5)?;
    let recent_reports = recent_reports(&conn, 5)?;

    Ok(Json(json!({
        "success": true,
        "stats": {
            "total_patients": total_patients,
            "total_reports": total_reports,
            "pending_reports": pending,
            "processed_reports": processed,
            "reviewed_reports": reviewed,
        },
        "recent_patients": recent_patients.iter().map(patient_json).collect::<Vec<_>>(),
        "recent_reports": recent_reports.iter().map(report_json).collect::<Vec<_>>(),
    })))
}
