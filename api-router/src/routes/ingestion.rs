use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::{api_state::ApiState, error::ApiError};

/// Trigger one reconciliation run over the blog files bucket.
///
/// Returns 409 when a run is already in flight; per-file failures do not
/// fail the request, they only show up in the report counts.
pub async fn run_ingestion(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let report = state.ingestion.reconcile().await?;

    Ok((
        StatusCode::OK,
        Json(json!({ "status": "success", "report": report })),
    ))
}
