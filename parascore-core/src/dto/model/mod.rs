//! Model host protocol
//!
//! Request and response bodies exchanged between a calculation worker and
//! the remote model host it is bound to.

use serde::{Deserialize, Serialize};

use crate::domain::recognition::Recognition;

/// Body posted to a model host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionRequest {
    pub text: String,
}

/// Prediction for one sentence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentencePrediction {
    pub sentence: String,
    pub is_paraphrase: bool,
    pub probability: f64,
}

/// Scoring result returned by a model host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResponse {
    pub version: String,
    pub source_text: String,
    pub recognition: Vec<SentencePrediction>,
    pub recognition_time: String,
}

/// Wire shape of a model host reply
///
/// Hosts answer with the service envelope `{"data": {...}}`; a bare payload
/// is accepted as well.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ModelReply {
    Enveloped { data: ModelResponse },
    Bare(ModelResponse),
}

impl ModelReply {
    pub fn into_response(self) -> ModelResponse {
        match self {
            ModelReply::Enveloped { data } => data,
            ModelReply::Bare(response) => response,
        }
    }
}

impl ModelResponse {
    /// Checks the values serde cannot, such as probability bounds
    pub fn validate(&self) -> Result<(), String> {
        for (idx, prediction) in self.recognition.iter().enumerate() {
            let p = prediction.probability;
            if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                return Err(format!(
                    "recognition[{}] probability {} is outside [0, 1]",
                    idx, p
                ));
            }
        }
        Ok(())
    }

    /// Converts predictions into recognitions numbered by response order
    pub fn into_recognitions(self) -> Vec<Recognition> {
        self.recognition
            .into_iter()
            .enumerate()
            .map(|(idx, prediction)| Recognition {
                sentence: prediction.sentence,
                is_paraphrase: prediction.is_paraphrase,
                probability: prediction.probability,
                sequence_number: idx as i32,
            })
            .collect()
    }
}
