//! Report domain types
//!
//! A report is one user-submitted text scored by a remote model host.
//! The record is owned by the durable store; the calculation manager only
//! moves it through its lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier assigned by the store when a report is created
pub type ReportId = i64;

/// Identifier of the user that submitted a report
pub type OwnerId = i64;

/// Report record
///
/// Structure shared between the server (persists) and the calculation
/// workers (update status and timestamps).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub text: String,
    pub status: ReportStatus,
    pub owner_id: OwnerId,
    pub created_at: DateTime<Utc>,
    pub calculation_started_at: Option<DateTime<Utc>>,
    pub calculation_ended_at: Option<DateTime<Utc>>,
    pub model_version: Option<String>,
}

/// Report calculation status
///
/// `Waiting -> InProcess -> {Completed | Error}`. Both terminal states are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    Waiting,
    InProcess,
    Completed,
    Error,
}

/// Rejected lifecycle change on a report
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("report {id} cannot move from {from} to {to}")]
    InvalidStatus {
        id: ReportId,
        from: ReportStatus,
        to: ReportStatus,
    },

    #[error("report {0} calculation was already started")]
    AlreadyStarted(ReportId),

    #[error("report {0} calculation was never started")]
    NotStarted(ReportId),

    #[error("report {0} calculation was already ended")]
    AlreadyEnded(ReportId),
}

impl Report {
    /// Creates a fresh report in `Waiting` status
    pub fn new(id: ReportId, text: impl Into<String>, owner_id: OwnerId) -> Self {
        Self {
            id,
            text: text.into(),
            status: ReportStatus::Waiting,
            owner_id,
            created_at: Utc::now(),
            calculation_started_at: None,
            calculation_ended_at: None,
            model_version: None,
        }
    }

    /// Marks the moment a worker picks the report up
    pub fn begin_calculation(&mut self, now: DateTime<Utc>) -> Result<(), TransitionError> {
        if self.calculation_started_at.is_some() {
            return Err(TransitionError::AlreadyStarted(self.id));
        }
        self.transition(ReportStatus::InProcess)?;
        self.calculation_started_at = Some(now);
        Ok(())
    }

    /// Records a successful calculation and the model version that produced it
    pub fn complete(&mut self, model_version: impl Into<String>) -> Result<(), TransitionError> {
        self.transition(ReportStatus::Completed)?;
        self.model_version = Some(model_version.into());
        Ok(())
    }

    /// Records a failed calculation
    pub fn fail(&mut self) -> Result<(), TransitionError> {
        self.transition(ReportStatus::Error)
    }

    /// Marks the moment a worker let go of the report, whatever the outcome
    pub fn end_calculation(&mut self, now: DateTime<Utc>) -> Result<(), TransitionError> {
        if self.calculation_started_at.is_none() {
            return Err(TransitionError::NotStarted(self.id));
        }
        if self.calculation_ended_at.is_some() {
            return Err(TransitionError::AlreadyEnded(self.id));
        }
        self.calculation_ended_at = Some(now);
        Ok(())
    }

    fn transition(&mut self, to: ReportStatus) -> Result<(), TransitionError> {
        if !self.status.can_transition_to(to) {
            return Err(TransitionError::InvalidStatus {
                id: self.id,
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}

impl ReportStatus {
    /// Whether the status can never change again
    pub fn is_terminal(self) -> bool {
        matches!(self, ReportStatus::Completed | ReportStatus::Error)
    }

    pub fn can_transition_to(self, next: ReportStatus) -> bool {
        matches!(
            (self, next),
            (ReportStatus::Waiting, ReportStatus::InProcess)
                | (ReportStatus::InProcess, ReportStatus::Completed)
                | (ReportStatus::InProcess, ReportStatus::Error)
        )
    }

    /// Single-letter code used by the `reports.status` column
    pub fn code(self) -> &'static str {
        match self {
            ReportStatus::Waiting => "W",
            ReportStatus::InProcess => "P",
            ReportStatus::Completed => "C",
            ReportStatus::Error => "E",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "W" => Some(ReportStatus::Waiting),
            "P" => Some(ReportStatus::InProcess),
            "C" => Some(ReportStatus::Completed),
            "E" => Some(ReportStatus::Error),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportStatus::Waiting => write!(f, "WAITING"),
            ReportStatus::InProcess => write!(f, "IN_PROCESS"),
            ReportStatus::Completed => write!(f, "COMPLETED"),
            ReportStatus::Error => write!(f, "ERROR"),
        }
    }
}
