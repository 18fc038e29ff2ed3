//! Calculation pool DTOs

use serde::{Deserialize, Serialize};

use crate::domain::report::ReportId;

/// Snapshot of the calculation pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolStatus {
    pub workers: Vec<WorkerSnapshot>,
    pub free_workers: usize,
    pub queued_reports: Vec<ReportId>,
}

/// State of a single worker at snapshot time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerSnapshot {
    pub id: usize,
    pub host: String,
    pub current_report: Option<ReportId>,
}

impl PoolStatus {
    pub fn busy_workers(&self) -> usize {
        self.workers
            .iter()
            .filter(|worker| worker.current_report.is_some())
            .count()
    }
}
