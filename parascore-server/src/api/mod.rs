//! API Module
//!
//! HTTP API layer for the server.
//! Each submodule handles endpoints for a specific domain.

pub mod calculation;
pub mod error;
pub mod health;
pub mod report;

use axum::{
    Router,
    routing::{get, post},
};
use parascore_calc::CalculationManager;
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub calculation: CalculationManager,
}

/// Create the main API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Report endpoints
        .route("/report", post(report::create_report))
        .route("/report/{id}", get(report::get_report))
        .route("/report/{id}/queue", get(report::get_queue_position))
        // Calculation pool
        .route("/calculation/status", get(calculation::get_status))
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
