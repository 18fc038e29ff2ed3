//! Calculation pool API endpoints

use parascore_core::dto::pool::PoolStatus;

use crate::error::Result;
use crate::{ReportClient, handle_response};

impl ReportClient {
    /// Get a snapshot of the calculation pool
    pub async fn pool_status(&self) -> Result<PoolStatus> {
        let url = format!("{}/calculation/status", self.base_url);
        let response = self.client.get(&url).send().await?;

        handle_response(response).await
    }
}
