//! Parascore HTTP Clients
//!
//! Type-safe HTTP clients for the two remote surfaces parascore talks to:
//!
//! - [`ModelClient`]: posts report text to one model host and decodes the
//!   scoring response. Each calculation worker owns one.
//! - [`ReportClient`]: the report server API, used by the CLI.
//!
//! # Example
//!
//! ```no_run
//! use parascore_client::ModelClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), parascore_client::ClientError> {
//!     let client = ModelClient::new("http://model-1:8000/predict");
//!     let response = client.recognize("The cat sat. A cat was sitting.").await?;
//!
//!     println!("Scored {} sentences", response.recognition.len());
//!     Ok(())
//! }
//! ```

pub mod error;
mod model;
mod pool;
mod reports;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use model::ModelClient;

use reqwest::Client;
use serde::de::DeserializeOwned;

/// Client for the report server API
///
/// Report endpoints live in `reports.rs`, the pool view in `pool.rs`.
#[derive(Debug, Clone)]
pub struct ReportClient {
    /// Server root without trailing slash (e.g., "http://localhost:8080")
    base_url: String,
    client: Client,
}

impl ReportClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Use a preconfigured reqwest client (timeouts, proxies, TLS)
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

// =============================================================================
// Response Handlers
// =============================================================================

/// Turns a server response into `T`
///
/// Error statuses keep the body as the message; the server sends
/// `{"error": "..."}` and only the inner text is kept when present.
pub(crate) async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(ClientError::api_error(status.as_u16(), error_message(body)));
    }

    serde_json::from_str(&body)
        .map_err(|e| ClientError::ParseError(format!("invalid server response: {}", e)))
}

fn error_message(body: String) -> String {
    serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|json| json.get("error")?.as_str().map(String::from))
        .unwrap_or(body)
}
