//! Report store
//!
//! Workers persist report progress through the [`ReportStore`] trait. The
//! server implements it on top of Postgres; [`InMemoryReportStore`] keeps
//! everything in process memory and is what the pool tests run against.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use parascore_core::domain::log::ReportLog;
use parascore_core::domain::recognition::Recognition;
use parascore_core::domain::report::{OwnerId, Report, ReportId};

use crate::error::StoreError;

/// Durable storage used by calculation workers
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Persists the mutable fields of a report (status, timestamps, model version)
    async fn save_report(&self, report: &Report) -> Result<(), StoreError>;

    /// Writes all recognitions of a report as one atomic batch
    ///
    /// A report gets at most one batch; a second call must fail.
    async fn insert_recognitions(
        &self,
        report_id: ReportId,
        recognitions: &[Recognition],
    ) -> Result<(), StoreError>;

    /// Records why a report calculation failed
    async fn insert_log(&self, log: &ReportLog) -> Result<(), StoreError>;
}

/// Process-local implementation of [`ReportStore`]
#[derive(Default)]
pub struct InMemoryReportStore {
    state: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    last_id: ReportId,
    reports: HashMap<ReportId, Report>,
    recognitions: HashMap<ReportId, Vec<Recognition>>,
    logs: Vec<ReportLog>,
}

impl InMemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a `WAITING` report with the next free id
    pub fn create_report(&self, text: impl Into<String>, owner_id: OwnerId) -> Report {
        let mut state = self.lock();
        state.last_id += 1;
        let report = Report::new(state.last_id, text, owner_id);
        state.reports.insert(report.id, report.clone());
        report
    }

    pub fn report(&self, report_id: ReportId) -> Option<Report> {
        self.lock().reports.get(&report_id).cloned()
    }

    /// Recognitions of a report ordered by sequence number
    pub fn recognitions(&self, report_id: ReportId) -> Vec<Recognition> {
        let mut recognitions = self
            .lock()
            .recognitions
            .get(&report_id)
            .cloned()
            .unwrap_or_default();
        recognitions.sort_by_key(|r| r.sequence_number);
        recognitions
    }

    pub fn logs(&self, report_id: ReportId) -> Vec<ReportLog> {
        self.lock()
            .logs
            .iter()
            .filter(|log| log.report_id == report_id)
            .cloned()
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ReportStore for InMemoryReportStore {
    async fn save_report(&self, report: &Report) -> Result<(), StoreError> {
        let mut state = self.lock();
        let stored = state
            .reports
            .get_mut(&report.id)
            .ok_or(StoreError::NotFound(report.id))?;
        *stored = report.clone();
        Ok(())
    }

    async fn insert_recognitions(
        &self,
        report_id: ReportId,
        recognitions: &[Recognition],
    ) -> Result<(), StoreError> {
        let mut state = self.lock();
        if !state.reports.contains_key(&report_id) {
            return Err(StoreError::NotFound(report_id));
        }
        if state.recognitions.contains_key(&report_id) {
            return Err(StoreError::RecognitionsExist(report_id));
        }
        state.recognitions.insert(report_id, recognitions.to_vec());
        Ok(())
    }

    async fn insert_log(&self, log: &ReportLog) -> Result<(), StoreError> {
        let mut state = self.lock();
        if !state.reports.contains_key(&log.report_id) {
            return Err(StoreError::NotFound(log.report_id));
        }
        state.logs.push(log.clone());
        Ok(())
    }
}
