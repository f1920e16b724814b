//! Document upload: validate early, store, then run the extraction
//! pipeline. The response always carries a fully populated field set; a
//! document nothing could be recovered from still produces an editable
//! form.

use axum::extract::{Multipart, State};
use axum::{Extension, Json};
use serde_json::{json, Value};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, AuthedUser};
use crate::pipeline::extraction::{UploadKind, UploadedDocument, MAX_UPLOAD_BYTES};
use crate::storage::store_upload;

/// `POST /api/upload` — multipart upload of a prior report.
///
/// Unsupported media types and oversize files are rejected before any
/// extraction work happens. Everything else terminates in a field set.
pub async fn upload(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<AuthedUser>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut document: Option<UploadedDocument> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed upload: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::to_string)
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| ApiError::BadRequest("No file selected".into()))?;

        let media_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| {
                mime_guess::from_path(&file_name)
                    .first_or_octet_stream()
                    .essence_str()
                    .to_string()
            });

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {e}")))?;

        document = Some(UploadedDocument::new(file_name, media_type, bytes.to_vec()));
    }

    let document = document.ok_or_else(|| ApiError::BadRequest("No file provided".into()))?;

    // Reject before any extraction attempt: wrong type or oversize.
    if UploadKind::from_media_type(&document.media_type).is_none() {
        return Err(ApiError::BadRequest(format!(
            "File type not allowed: {}",
            document.media_type
        )));
    }
    if document.size() > MAX_UPLOAD_BYTES {
        return Err(ApiError::BadRequest(format!(
            "File exceeds the {} MB upload limit",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        )));
    }

    let stored_path = store_upload(&ctx.config.uploads_dir, &document.file_name, &document.bytes)
        .map_err(|e| ApiError::Internal(format!("Failed to store upload: {e}")))?;

    let report = ctx.extractor.extract_fields(&document);

    tracing::info!(
        file = %document.file_name,
        by = %user.email,
        strategy = report.strategy.as_str(),
        meaningful_fields = report.meaningful_fields,
        "upload extracted"
    );

    Ok(Json(json!({
        "success": true,
        "message": "File uploaded successfully",
        "file_path": stored_path.to_string_lossy(),
        "strategy": report.strategy.as_str(),
        "extracted": report.fields,
        "meaningful_fields": report.meaningful_fields,
        "recovered_text": report.recovered_text,
    })))
}
