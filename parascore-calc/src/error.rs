//! Error types for the calculation pool

use parascore_client::ClientError;
use parascore_core::domain::report::{ReportId, ReportStatus, TransitionError};
use thiserror::Error;

/// Why a model host could not score a report
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Host unreachable, connection dropped or request timed out
    #[error("model host request failed: {0}")]
    Transport(String),

    /// Host answered with an error status
    #[error("model host returned status {status}: {message}")]
    Remote { status: u16, message: String },

    /// Host answered with a payload that does not follow the protocol
    #[error("malformed model response: {0}")]
    Malformed(String),
}

impl From<ClientError> for DispatchError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::ApiError { status, message } => DispatchError::Remote { status, message },
            ClientError::ParseError(msg) => DispatchError::Malformed(msg),
            other if other.is_timeout() => {
                DispatchError::Transport(format!("timed out waiting for model host: {}", other))
            }
            other => DispatchError::Transport(other.to_string()),
        }
    }
}

/// Failure of the durable report store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("report {0} not found")]
    NotFound(ReportId),

    #[error("recognitions for report {0} were already written")]
    RecognitionsExist(ReportId),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Outcome of a failed report calculation
///
/// Returned by [`crate::Worker::start`] to the task that supervises it.
#[derive(Debug, Error)]
pub enum CalculationError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("calculation panicked: {0}")]
    Panicked(String),

    /// Bookkeeping after the calculation failed as well
    #[error("{source}; while finishing: {finish}")]
    Finish {
        #[source]
        source: Box<CalculationError>,
        finish: Box<CalculationError>,
    },
}

/// Pool construction failure
#[derive(Debug, Error)]
pub enum InitError {
    #[error("invalid calculation config: {0}")]
    Config(String),

    #[error("calculation pool must be created inside a Tokio runtime")]
    NoRuntime,

    #[error("failed to create client for model host {host}: {source}")]
    Client {
        host: String,
        #[source]
        source: ClientError,
    },
}

/// Report refused by [`crate::CalculationManager::submit`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("report {id} is {status}, only WAITING reports can be submitted")]
    NotWaiting { id: ReportId, status: ReportStatus },

    #[error("report {0} is already queued")]
    AlreadyQueued(ReportId),

    #[error("report {0} is already being calculated")]
    AlreadyRunning(ReportId),
}

/// The report is not in the wait queue of this pool
///
/// It may be running, finished, or unknown to this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("report {0} is not in calculation queue")]
pub struct NotInQueue(pub ReportId);
