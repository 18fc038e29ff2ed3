//! Repository Module
//!
//! Data access layer for the server.
//! Each repository handles database operations for a specific domain entity.

pub mod log;
pub mod recognition;
pub mod report;

// Re-export for convenience
pub use log as log_repository;
pub use recognition as recognition_repository;
pub use report as report_repository;
