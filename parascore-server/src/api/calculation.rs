//! Calculation API Handlers
//!
//! Operator view of the calculation pool.

use axum::{Json, extract::State};
use parascore_core::dto::pool::PoolStatus;

use crate::api::AppState;

/// GET /calculation/status
/// Workers, their current reports and the wait queue
pub async fn get_status(State(state): State<AppState>) -> Json<PoolStatus> {
    Json(state.calculation.status())
}
