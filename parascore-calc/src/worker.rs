//! Calculation worker
//!
//! A worker is bound to one model host and scores one report at a time.
//! It moves the report through its lifecycle, persists every step through
//! the [`ReportStore`], and hands itself back to the pool when done.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use chrono::Utc;
use futures::FutureExt;
use parascore_core::domain::log::ReportLog;
use parascore_core::domain::report::{Report, ReportStatus};
use tracing::{debug, info, warn};

use crate::dispatch::ModelService;
use crate::error::{CalculationError, DispatchError};
use crate::pool::WorkerLease;
use crate::store::ReportStore;

/// Stable worker identifier, assigned in build order
pub type WorkerId = usize;

/// Executes report calculations against a single model host
pub struct Worker {
    id: WorkerId,
    host: String,
    model: Arc<dyn ModelService>,
    store: Arc<dyn ReportStore>,
}

impl Worker {
    pub fn new(
        id: WorkerId,
        host: impl Into<String>,
        model: Arc<dyn ModelService>,
        store: Arc<dyn ReportStore>,
    ) -> Self {
        Self {
            id,
            host: host.into(),
            model,
            store,
        }
    }

    pub fn id(&self) -> WorkerId {
        self.id
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Runs one report end to end
    ///
    /// The report is marked `IN_PROCESS`, scored on the bound host and ends
    /// `COMPLETED` with its recognitions or `ERROR` with a failure log. A
    /// panic while scoring counts as a failure. The end timestamp is
    /// persisted in every case, and only then is `lease` released so the
    /// pool can hand this worker the next report.
    ///
    /// # Returns
    /// The final report, or the failure that ended it
    pub async fn start(
        &self,
        mut report: Report,
        lease: WorkerLease,
    ) -> Result<Report, CalculationError> {
        info!(
            worker_id = self.id,
            report_id = report.id,
            host = %self.host,
            "Starting report calculation"
        );

        let outcome = match AssertUnwindSafe(self.calculate(&mut report))
            .catch_unwind()
            .await
        {
            Ok(outcome) => outcome,
            Err(panic) => Err(CalculationError::Panicked(panic_message(panic))),
        };

        let failure_recorded = match &outcome {
            Ok(()) => Ok(()),
            Err(err) => self.record_failure(&mut report, err).await,
        };
        let finished = self.finish(&mut report).await;

        drop(lease);

        let cleanup = failure_recorded.and(finished);
        match (outcome, cleanup) {
            (Ok(()), Ok(())) => {
                info!(
                    worker_id = self.id,
                    report_id = report.id,
                    status = %report.status,
                    "Report calculation finished"
                );
                Ok(report)
            }
            (Err(err), Ok(())) | (Ok(()), Err(err)) => Err(err),
            (Err(err), Err(finish)) => Err(CalculationError::Finish {
                source: Box::new(err),
                finish: Box::new(finish),
            }),
        }
    }

    /// Marks the report started, scores it, and stores the recognitions
    async fn calculate(&self, report: &mut Report) -> Result<(), CalculationError> {
        report.begin_calculation(Utc::now())?;
        self.store.save_report(report).await?;

        let response = self.model.recognize(&report.text).await?;
        response.validate().map_err(DispatchError::Malformed)?;

        let version = response.version.clone();
        let recognitions = response.into_recognitions();
        debug!(
            worker_id = self.id,
            report_id = report.id,
            sentences = recognitions.len(),
            model_version = %version,
            "Model host scored report"
        );

        self.store
            .insert_recognitions(report.id, &recognitions)
            .await?;
        report.complete(version)?;

        Ok(())
    }

    /// Writes the failure log and moves the report to `ERROR`
    async fn record_failure(
        &self,
        report: &mut Report,
        err: &CalculationError,
    ) -> Result<(), CalculationError> {
        warn!(
            worker_id = self.id,
            report_id = report.id,
            error = %err,
            "Report calculation failed"
        );

        // Never picked up by this worker, nothing to mark
        if report.status != ReportStatus::InProcess {
            return Ok(());
        }

        let logged = self
            .store
            .insert_log(&ReportLog::new(report.id, err.to_string()))
            .await;
        report.fail()?;
        logged.map_err(Into::into)
    }

    /// Stamps the end of the calculation and persists the final record
    async fn finish(&self, report: &mut Report) -> Result<(), CalculationError> {
        if report.calculation_started_at.is_none() {
            return Ok(());
        }

        report.end_calculation(Utc::now())?;
        self.store.save_report(report).await?;
        Ok(())
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    match panic.downcast::<String>() {
        Ok(message) => *message,
        Err(panic) => match panic.downcast::<&'static str>() {
            Ok(message) => message.to_string(),
            Err(_) => "unknown panic payload".to_string(),
        },
    }
}
