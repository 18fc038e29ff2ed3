//! Core domain types
//!
//! This module contains the core domain structures used across parascore services.
//! They are shared between the server (for persistence) and the calculation
//! workers (for execution).

pub mod log;
pub mod recognition;
pub mod report;
