//! Model host client
//!
//! Speaks the scoring protocol with a single remote model host.

use std::time::Duration;

use parascore_core::dto::model::{ModelReply, ModelResponse, RecognitionRequest};
use reqwest::Client;

use crate::error::{ClientError, Result};

/// HTTP client bound to one model host endpoint
#[derive(Debug, Clone)]
pub struct ModelClient {
    /// Full URL of the scoring endpoint
    url: String,
    client: Client,
}

impl ModelClient {
    /// Create a client without a request timeout
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: Client::new(),
        }
    }

    /// Create a client whose requests give up after `timeout`
    ///
    /// `None` keeps reqwest's default of waiting indefinitely.
    pub fn with_timeout(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            url: url.into(),
            client: builder.build()?,
        })
    }

    /// URL of the scoring endpoint
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Score a text on the bound host
    ///
    /// A body that does not decode as a model reply is reported as
    /// [`ClientError::ParseError`]. Value ranges are checked by the caller.
    pub async fn recognize(&self, text: &str) -> Result<ModelResponse> {
        tracing::debug!(url = %self.url, chars = text.len(), "Sending text to model host");

        let response = self
            .client
            .post(&self.url)
            .json(&RecognitionRequest {
                text: text.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::api_error(status.as_u16(), body));
        }

        let reply: ModelReply = serde_json::from_str(&body)
            .map_err(|e| ClientError::ParseError(format!("Invalid model response: {}", e)))?;

        Ok(reply.into_response())
    }
}
