//! Report Service
//!
//! Business logic for report creation and lookup.

use parascore_calc::{CalculationManager, Submission, SubmitError};
use parascore_core::domain::report::{OwnerId, Report, ReportId, ReportStatus};
use parascore_core::dto::report::{CreateReport, QueuePosition, ReportInfo};
use sqlx::PgPool;

use crate::repository::{log_repository, recognition_repository, report_repository};

/// Service error type
#[derive(Debug)]
pub enum ReportError {
    NotFound(ReportId),
    ValidationError(String),
    SubmitRejected(SubmitError),
    DatabaseError(sqlx::Error),
}

impl From<sqlx::Error> for ReportError {
    fn from(err: sqlx::Error) -> Self {
        ReportError::DatabaseError(err)
    }
}

/// Store a new report and hand it to the calculation pool
///
/// Returns as soon as the report is running or queued.
pub async fn create_report(
    pool: &PgPool,
    calculation: &CalculationManager,
    req: CreateReport,
) -> Result<ReportInfo, ReportError> {
    req.validate().map_err(ReportError::ValidationError)?;

    let report = report_repository::create(pool, &req).await?;

    let queue_position = match calculation
        .submit(report.clone())
        .map_err(ReportError::SubmitRejected)?
    {
        Submission::Started { worker_id } => {
            tracing::info!(report_id = report.id, worker_id, "Report created and started");
            None
        }
        Submission::Queued { position } => {
            tracing::info!(report_id = report.id, position, "Report created and queued");
            Some(position)
        }
    };

    Ok(ReportInfo::new(report, queue_position, Vec::new(), None))
}

/// Get a report with its recognitions, queue position and last error
///
/// When `owner_id` is given, reports of other owners are reported as not found.
pub async fn get_report_info(
    pool: &PgPool,
    calculation: &CalculationManager,
    id: ReportId,
    owner_id: Option<OwnerId>,
) -> Result<ReportInfo, ReportError> {
    let report = report_repository::find_by_id(pool, id)
        .await?
        .ok_or(ReportError::NotFound(id))?;
    check_owner(&report, owner_id)?;

    let queue_position = waiting_position(&report, calculation);
    let recognitions = recognition_repository::find_by_report(pool, id).await?;
    let error = match report.status {
        ReportStatus::Error => log_repository::find_latest(pool, id)
            .await?
            .map(|log| log.error),
        _ => None,
    };

    Ok(ReportInfo::new(report, queue_position, recognitions, error))
}

/// Get the live queue position of a report
pub async fn get_queue_position(
    pool: &PgPool,
    calculation: &CalculationManager,
    id: ReportId,
) -> Result<QueuePosition, ReportError> {
    let report = report_repository::find_by_id(pool, id)
        .await?
        .ok_or(ReportError::NotFound(id))?;

    Ok(QueuePosition {
        report_id: id,
        position: waiting_position(&report, calculation),
    })
}

// =============================================================================
// Helpers
// =============================================================================

fn check_owner(report: &Report, owner_id: Option<OwnerId>) -> Result<(), ReportError> {
    match owner_id {
        Some(owner) if owner != report.owner_id => Err(ReportError::NotFound(report.id)),
        _ => Ok(()),
    }
}

/// Reports left `WAITING` by a previous process are not in the live queue
/// and have no known position.
fn waiting_position(report: &Report, calculation: &CalculationManager) -> Option<usize> {
    if report.status != ReportStatus::Waiting {
        return None;
    }
    calculation.queue_position(report.id).ok()
}
