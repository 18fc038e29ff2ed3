//! Model dispatch
//!
//! A worker scores report text through a [`ModelService`]. In production this
//! is a [`ModelClient`] speaking HTTP to the worker's bound host.

use async_trait::async_trait;
use parascore_client::ModelClient;
use parascore_core::dto::model::ModelResponse;

use crate::error::DispatchError;

/// Service trait for scoring a text on a model host
#[async_trait]
pub trait ModelService: Send + Sync {
    /// Scores `text` and returns the validated model response
    ///
    /// Implementations block for as long as the remote host takes; they are
    /// never called while the pool lock is held.
    async fn recognize(&self, text: &str) -> Result<ModelResponse, DispatchError>;
}

#[async_trait]
impl ModelService for ModelClient {
    async fn recognize(&self, text: &str) -> Result<ModelResponse, DispatchError> {
        ModelClient::recognize(self, text).await.map_err(Into::into)
    }
}
