use sqlx::{PgPool, postgres::PgPoolOptions};
use std::time::Duration;

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Status is stored as a single-letter code: W, P, C or E
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reports (
            id BIGSERIAL PRIMARY KEY,
            text TEXT NOT NULL,
            status VARCHAR(1) NOT NULL DEFAULT 'W',
            owner_id BIGINT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            calculation_started_at TIMESTAMPTZ,
            calculation_ended_at TIMESTAMPTZ,
            model_version VARCHAR(255)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS report_recognitions (
            id BIGSERIAL PRIMARY KEY,
            report_id BIGINT NOT NULL REFERENCES reports(id) ON DELETE CASCADE,
            sentence TEXT NOT NULL,
            is_paraphrase BOOLEAN NOT NULL,
            probability DOUBLE PRECISION NOT NULL,
            sequence_number INTEGER NOT NULL,
            UNIQUE (report_id, sequence_number)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS report_logs (
            id BIGSERIAL PRIMARY KEY,
            report_id BIGINT NOT NULL REFERENCES reports(id) ON DELETE CASCADE,
            error TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_reports_owner_id ON reports(owner_id)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_reports_status ON reports(status)")
        .execute(pool)
        .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_report_logs_report_id ON report_logs(report_id, created_at DESC)",
    )
    .execute(pool)
    .await?;

    tracing::info!("Database migrations completed successfully");
    Ok(())
}
