//! Recognition Repository
//!
//! Handles all database operations related to report recognitions.

use parascore_core::domain::recognition::Recognition;
use parascore_core::domain::report::ReportId;
use sqlx::PgPool;

/// Insert all recognitions of a report in one transaction
///
/// Returns false, writing nothing, if the report already has recognitions.
pub async fn insert_batch(
    pool: &PgPool,
    report_id: ReportId,
    recognitions: &[Recognition],
) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let (exists,): (bool,) = sqlx::query_as(
        "SELECT EXISTS(SELECT 1 FROM report_recognitions WHERE report_id = $1)",
    )
    .bind(report_id)
    .fetch_one(&mut *tx)
    .await?;

    if exists {
        tx.rollback().await?;
        return Ok(false);
    }

    for recognition in recognitions {
        sqlx::query(
            r#"
            INSERT INTO report_recognitions
                (report_id, sentence, is_paraphrase, probability, sequence_number)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(report_id)
        .bind(&recognition.sentence)
        .bind(recognition.is_paraphrase)
        .bind(recognition.probability)
        .bind(recognition.sequence_number)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(true)
}

/// Get all recognitions of a report, ordered by sequence number
pub async fn find_by_report(
    pool: &PgPool,
    report_id: ReportId,
) -> Result<Vec<Recognition>, sqlx::Error> {
    let rows = sqlx::query_as::<_, RecognitionRow>(
        r#"
        SELECT sentence, is_paraphrase, probability, sequence_number
        FROM report_recognitions
        WHERE report_id = $1
        ORDER BY sequence_number ASC
        "#,
    )
    .bind(report_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct RecognitionRow {
    sentence: String,
    is_paraphrase: bool,
    probability: f64,
    sequence_number: i32,
}

impl From<RecognitionRow> for Recognition {
    fn from(row: RecognitionRow) -> Self {
        Recognition {
            sentence: row.sentence,
            is_paraphrase: row.is_paraphrase,
            probability: row.probability,
            sequence_number: row.sequence_number,
        }
    }
}
