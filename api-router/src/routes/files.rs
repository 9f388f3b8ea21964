use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use common::error::AppError;
use serde_json::json;
use tracing::info;

use crate::{api_state::ApiState, error::ApiError};

/// Accept a blog source file and store it in the upload bucket.
///
/// The object key is prefixed with the upload timestamp so repeated uploads
/// of the same file name do not overwrite each other.
pub async fn upload_file(
    State(state): State<ApiState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::ValidationError(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .file_name()
            .map(ToString::to_string)
            .ok_or_else(|| {
                ApiError::ValidationError("file field is missing a file name".to_string())
            })?;
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::ValidationError(e.to_string()))?;

        let location = format!(
            "{}/{}-{}",
            state.config.blog_files_prefix,
            Utc::now().timestamp_millis(),
            file_name
        );
        state
            .storage
            .put(&location, data)
            .await
            .map_err(AppError::from)?;

        info!(%location, "stored uploaded blog file");
        return Ok((
            StatusCode::OK,
            Json(json!({ "status": "success", "location": location })),
        ));
    }

    Err(ApiError::ValidationError(
        "multipart field 'file' is required".to_string(),
    ))
}
