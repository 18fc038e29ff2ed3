//! Service Module
//!
//! Business logic layer for the server.
//! Services orchestrate between repositories and the calculation pool.

pub mod report;

// Re-export for convenience
pub use report as report_service;
