//! Recognition domain types

use serde::{Deserialize, Serialize};

/// One scored sentence of a report
///
/// Written as a batch when a calculation succeeds and never modified afterwards.
/// Reads are ordered by `sequence_number`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recognition {
    pub sentence: String,
    pub is_paraphrase: bool,
    pub probability: f64,
    pub sequence_number: i32,
}
