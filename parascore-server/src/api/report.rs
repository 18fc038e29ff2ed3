//! Report API Handlers
//!
//! HTTP endpoints for report submission and lookup.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use parascore_core::domain::report::{OwnerId, ReportId};
use parascore_core::dto::report::{CreateReport, QueuePosition, ReportInfo};
use serde::Deserialize;

use crate::api::AppState;
use crate::api::error::ApiResult;
use crate::service::report_service;

/// POST /report
/// Create a report and submit it for calculation
pub async fn create_report(
    State(state): State<AppState>,
    Json(req): Json<CreateReport>,
) -> ApiResult<(StatusCode, Json<ReportInfo>)> {
    tracing::info!("Creating report for owner: {}", req.owner_id);

    let info = report_service::create_report(&state.pool, &state.calculation, req).await?;

    Ok((StatusCode::CREATED, Json(info)))
}

/// GET /report/{id}
/// Get report details, recognitions and queue position
///
/// Query parameters:
/// - `owner_id` (optional): Only return the report if it belongs to this owner
pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<ReportId>,
    Query(params): Query<ReportQuery>,
) -> ApiResult<Json<ReportInfo>> {
    tracing::debug!("Getting report: {}", id);

    let info =
        report_service::get_report_info(&state.pool, &state.calculation, id, params.owner_id)
            .await?;

    Ok(Json(info))
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub owner_id: Option<OwnerId>,
}

/// GET /report/{id}/queue
/// Get the live wait queue position of a report
pub async fn get_queue_position(
    State(state): State<AppState>,
    Path(id): Path<ReportId>,
) -> ApiResult<Json<QueuePosition>> {
    tracing::debug!("Getting queue position of report: {}", id);

    let position = report_service::get_queue_position(&state.pool, &state.calculation, id).await?;

    Ok(Json(position))
}
