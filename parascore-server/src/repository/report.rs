//! Report Repository
//!
//! Handles all database operations related to reports.

use chrono::{DateTime, Utc};
use parascore_core::domain::report::{Report, ReportId, ReportStatus};
use parascore_core::dto::report::CreateReport;
use sqlx::PgPool;

/// Create a new `WAITING` report and return the stored record
pub async fn create(pool: &PgPool, req: &CreateReport) -> Result<Report, sqlx::Error> {
    let row = sqlx::query_as::<_, ReportRow>(
        r#"
        INSERT INTO reports (text, status, owner_id, created_at)
        VALUES ($1, $2, $3, $4)
        RETURNING id, text, status, owner_id, created_at, calculation_started_at,
                  calculation_ended_at, model_version
        "#,
    )
    .bind(&req.text)
    .bind(ReportStatus::Waiting.code())
    .bind(req.owner_id)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    row.try_into()
}

/// Find a report by ID
pub async fn find_by_id(pool: &PgPool, id: ReportId) -> Result<Option<Report>, sqlx::Error> {
    let row = sqlx::query_as::<_, ReportRow>(
        r#"
        SELECT id, text, status, owner_id, created_at, calculation_started_at,
               calculation_ended_at, model_version
        FROM reports
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(Report::try_from).transpose()
}

/// Overwrite status, calculation timestamps and model version
///
/// Returns false if no report with this ID exists.
pub async fn update(pool: &PgPool, report: &Report) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE reports
        SET status = $1, calculation_started_at = $2, calculation_ended_at = $3,
            model_version = $4
        WHERE id = $5
        "#,
    )
    .bind(report.status.code())
    .bind(report.calculation_started_at)
    .bind(report.calculation_ended_at)
    .bind(&report.model_version)
    .bind(report.id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct ReportRow {
    id: i64,
    text: String,
    status: String,
    owner_id: i64,
    created_at: DateTime<Utc>,
    calculation_started_at: Option<DateTime<Utc>>,
    calculation_ended_at: Option<DateTime<Utc>>,
    model_version: Option<String>,
}

impl TryFrom<ReportRow> for Report {
    type Error = sqlx::Error;

    fn try_from(row: ReportRow) -> Result<Self, Self::Error> {
        let status = ReportStatus::from_code(&row.status).ok_or_else(|| {
            sqlx::Error::Decode(
                format!("unknown status code {:?} for report {}", row.status, row.id).into(),
            )
        })?;

        Ok(Report {
            id: row.id,
            text: row.text,
            status,
            owner_id: row.owner_id,
            created_at: row.created_at,
            calculation_started_at: row.calculation_started_at,
            calculation_ended_at: row.calculation_ended_at,
            model_version: row.model_version,
        })
    }
}
