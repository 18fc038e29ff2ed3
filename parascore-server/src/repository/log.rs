//! Log Repository
//!
//! Handles all database operations related to report failure logs.

use parascore_core::domain::log::ReportLog;
use parascore_core::domain::report::ReportId;
use sqlx::PgPool;

/// Add a failure log entry for a report
pub async fn create(pool: &PgPool, log: &ReportLog) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO report_logs (report_id, error, created_at)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(log.report_id)
    .bind(&log.error)
    .bind(log.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get the most recent failure log of a report
pub async fn find_latest(
    pool: &PgPool,
    report_id: ReportId,
) -> Result<Option<ReportLog>, sqlx::Error> {
    let row = sqlx::query_as::<_, LogRow>(
        r#"
        SELECT report_id, error, created_at
        FROM report_logs
        WHERE report_id = $1
        ORDER BY created_at DESC, id DESC
        LIMIT 1
        "#,
    )
    .bind(report_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.into()))
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct LogRow {
    report_id: i64,
    error: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<LogRow> for ReportLog {
    fn from(row: LogRow) -> Self {
        ReportLog {
            report_id: row.report_id,
            error: row.error,
            created_at: row.created_at,
        }
    }
}
