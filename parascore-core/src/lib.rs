//! Parascore Core
//!
//! Core types and abstractions for the parascore report service.
//!
//! This crate contains:
//! - Domain types: Report, its status machine, recognitions and failure logs
//! - DTOs: Report API bodies, pool snapshots and the model host protocol

pub mod domain;
pub mod dto;
