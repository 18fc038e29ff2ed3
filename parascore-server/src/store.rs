//! Postgres Report Store
//!
//! Backs the calculation workers' [`ReportStore`] with the report
//! repositories.

use async_trait::async_trait;
use parascore_calc::{ReportStore, StoreError};
use parascore_core::domain::log::ReportLog;
use parascore_core::domain::recognition::Recognition;
use parascore_core::domain::report::{Report, ReportId};
use sqlx::PgPool;

use crate::repository::{log_repository, recognition_repository, report_repository};

pub struct PgReportStore {
    pool: PgPool,
}

impl PgReportStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

#[async_trait]
impl ReportStore for PgReportStore {
    async fn save_report(&self, report: &Report) -> Result<(), StoreError> {
        let updated = report_repository::update(&self.pool, report)
            .await
            .map_err(backend)?;
        if !updated {
            return Err(StoreError::NotFound(report.id));
        }
        Ok(())
    }

    async fn insert_recognitions(
        &self,
        report_id: ReportId,
        recognitions: &[Recognition],
    ) -> Result<(), StoreError> {
        let inserted = recognition_repository::insert_batch(&self.pool, report_id, recognitions)
            .await
            .map_err(backend)?;
        if !inserted {
            return Err(StoreError::RecognitionsExist(report_id));
        }
        Ok(())
    }

    async fn insert_log(&self, log: &ReportLog) -> Result<(), StoreError> {
        log_repository::create(&self.pool, log)
            .await
            .map_err(backend)
    }
}
