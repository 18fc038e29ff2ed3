//! Report log domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::report::ReportId;

/// Failure record written once for every report that ends in `ERROR`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportLog {
    pub report_id: ReportId,
    pub error: String,
    pub created_at: DateTime<Utc>,
}

impl ReportLog {
    pub fn new(report_id: ReportId, error: impl Into<String>) -> Self {
        Self {
            report_id,
            error: error.into(),
            created_at: Utc::now(),
        }
    }
}
