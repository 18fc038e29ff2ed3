//! Report DTOs for the report API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::recognition::Recognition;
use crate::domain::report::{OwnerId, Report, ReportId, ReportStatus};

/// Longest text accepted for a single report
pub const MAX_TEXT_LENGTH: usize = 10_000;

/// Request to create a new report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReport {
    pub owner_id: OwnerId,
    pub text: String,
}

impl CreateReport {
    /// Checks the request body before a record is created
    pub fn validate(&self) -> Result<(), String> {
        if self.text.trim().is_empty() {
            return Err("Report text cannot be empty".to_string());
        }

        let length = self.text.chars().count();
        if length > MAX_TEXT_LENGTH {
            return Err(format!(
                "Report text is too long ({} characters, max {})",
                length, MAX_TEXT_LENGTH
            ));
        }

        Ok(())
    }
}

/// Report state as shown to the submitting user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportInfo {
    pub id: ReportId,
    pub text: String,
    pub status: ReportStatus,
    pub owner_id: OwnerId,
    /// 1-based place in the wait queue; `None` when not waiting or unknown
    pub queue_position: Option<usize>,
    pub created_at: DateTime<Utc>,
    pub calculation_started_at: Option<DateTime<Utc>>,
    pub calculation_ended_at: Option<DateTime<Utc>>,
    pub model_version: Option<String>,
    pub recognitions: Vec<Recognition>,
    pub error: Option<String>,
}

impl ReportInfo {
    pub fn new(
        report: Report,
        queue_position: Option<usize>,
        recognitions: Vec<Recognition>,
        error: Option<String>,
    ) -> Self {
        Self {
            id: report.id,
            text: report.text,
            status: report.status,
            owner_id: report.owner_id,
            queue_position,
            created_at: report.created_at,
            calculation_started_at: report.calculation_started_at,
            calculation_ended_at: report.calculation_ended_at,
            model_version: report.model_version,
            recognitions,
            error,
        }
    }
}

/// Live queue position of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuePosition {
    pub report_id: ReportId,
    pub position: Option<usize>,
}
