//! Data Transfer Objects for inter-service communication
//!
//! This module contains DTOs exchanged between parascore components:
//! the report API, the calculation pool status, and the model host protocol.

pub mod model;
pub mod pool;
pub mod report;
