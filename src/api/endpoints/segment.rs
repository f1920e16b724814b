//! Segmentation proxy: forwards an uploaded scan image to the external
//! inference service and relays the overlay back to the doctor UI.

use axum::extract::{Multipart, State};
use axum::{Extension, Json};
use serde_json::{json, Value};

use crate::api::endpoints::require_role;
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, AuthedUser};
use crate::models::Role;

/// `POST /api/segment` — run segmentation on an uploaded image (doctor
/// only). Single attempt; a failed or timed-out inference call surfaces
/// as a retryable 502.
pub async fn segment(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<AuthedUser>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    require_role(&user, Role::Doctor)?;

    let mut image: Option<Vec<u8>> = None;
    let mut model: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed upload: {e}")))?
    {
        match field.name() {
            Some("image") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read image: {e}")))?;
                image = Some(bytes.to_vec());
            }
            Some("model_path") => {
                model = field.text().await.ok().filter(|m| !m.trim().is_empty());
            }
            _ => {}
        }
    }

    let image = image
        .filter(|bytes| !bytes.is_empty())
        .ok_or_else(|| ApiError::BadRequest("No image file".into()))?;

    let result = ctx.segmentation.segment(&image, model.as_deref()).await?;

    tracing::info!(
        by = %user.email,
        affected = result.affected_percentage,
        "segmentation complete"
    );

    Ok(Json(json!({
        "image_data_uri": result.image_data_uri,
        "affected_percentage": result.affected_percentage,
    })))
}
