//! Health Check API Handler

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::api::AppState;

/// GET /health
/// Liveness probe with the size of the calculation pool
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "workers": state.calculation.worker_count(),
        })),
    )
}
