use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

/// Liveness: the process is serving requests
pub async fn liveness_check() -> impl IntoResponse {
    Json(json!({ "status": "alive" }))
}

/// Readiness: the storage directory is usable
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.storage.check_ready().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ready" }))),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable", "storage": "unavailable" })),
            )
        }
    }
}
