//! Parascore Calculation
//!
//! Runs paraphrase-recognition reports on a fixed set of workers.
//!
//! Architecture:
//! - Configuration: model hosts and workers per host, from environment
//! - Workers: each bound to one model host, one report at a time
//! - Pool: FIFO wait queue and free-worker bookkeeping
//! - Store: persistence seam implemented by the server on Postgres
//!
//! Submitting never blocks on a calculation. A report either starts on a
//! free worker or waits in the queue until a worker finishes.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod pool;
pub mod store;
pub mod worker;

pub use config::CalculationConfig;
pub use dispatch::ModelService;
pub use error::{
    CalculationError, DispatchError, InitError, NotInQueue, StoreError, SubmitError,
};
pub use pool::{CalculationManager, Submission, WorkerLease};
pub use store::{InMemoryReportStore, ReportStore};
pub use worker::{Worker, WorkerId};
