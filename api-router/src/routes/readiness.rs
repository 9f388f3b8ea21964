use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::api_state::ApiState;

/// Readiness probe: 200 once the blog_post table is provisioned.
///
/// Uses the same provisioning check the ingestion pipeline runs before
/// touching any file, so a ready service is one whose trigger endpoint can
/// actually do work.
pub async fn ready(State(state): State<ApiState>) -> impl IntoResponse {
    match state.db.verify_provisioned().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ready" }))),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unavailable",
                "reason": e.to_string()
            })),
        ),
    }
}
