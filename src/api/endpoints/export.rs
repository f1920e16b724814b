//! Report export endpoint. All formats deliver an HTML body with an
//! attachment disposition; the browser handles print/convert.

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, AuthedUser};
use crate::export::{attachment_filename, render_html, ExportFormat, ReportExportData};

#[derive(Deserialize)]
pub struct ExportRequest {
    #[serde(default = "default_format")]
    pub format: ExportFormat,
    #[serde(rename = "reportData", default)]
    pub report_data: ReportExportData,
}

fn default_format() -> ExportFormat {
    ExportFormat::Pdf
}

/// `POST /api/export-report` — render the report payload to a document.
pub async fn export(
    State(_ctx): State<ApiContext>,
    Extension(user): Extension<AuthedUser>,
    Json(payload): Json<ExportRequest>,
) -> Result<Response, ApiError> {
    let generated_at = chrono::Local::now()
        .format("%B %d, %Y at %I:%M %p")
        .to_string();
    let html = render_html(&payload.report_data, &generated_at);
    let filename = attachment_filename(&payload.report_data, payload.format);

    tracing::info!(by = %user.email, %filename, "report exported");

    let mut response = html.into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        "text/html; charset=utf-8"
            .parse()
            .map_err(|_| ApiError::Internal("content type header".into()))?,
    );
    response.headers_mut().insert(
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"{filename}\"")
            .parse()
            .map_err(|_| ApiError::Internal("disposition header".into()))?,
    );
    Ok(response)
}
