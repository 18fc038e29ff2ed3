//! Report-related API endpoints

use parascore_core::domain::report::{OwnerId, ReportId};
use parascore_core::dto::report::{CreateReport, QueuePosition, ReportInfo};

use crate::error::{ClientError, Result};
use crate::{ReportClient, handle_response};

impl ReportClient {
    // =============================================================================
    // Report Lifecycle
    // =============================================================================

    /// Create a report and hand it to the calculation pool
    ///
    /// # Arguments
    /// * `req` - The report creation request
    ///
    /// # Returns
    /// The created report, usually `WAITING` or already `IN_PROCESS`
    pub async fn create_report(&self, req: CreateReport) -> Result<ReportInfo> {
        req.validate().map_err(ClientError::InvalidRequest)?;

        let url = format!("{}/report", self.base_url);
        let response = self.client.post(&url).json(&req).send().await?;

        handle_response(response).await
    }

    /// Get a report by ID
    ///
    /// # Arguments
    /// * `report_id` - The report ID
    /// * `owner_id` - When set, only the owner's report is returned
    pub async fn get_report(
        &self,
        report_id: ReportId,
        owner_id: Option<OwnerId>,
    ) -> Result<ReportInfo> {
        let url = format!("{}/report/{}", self.base_url, report_id);
        let mut request = self.client.get(&url);
        if let Some(owner_id) = owner_id {
            request = request.query(&[("owner_id", owner_id)]);
        }
        let response = request.send().await?;

        handle_response(response).await
    }

    /// Get the live queue position of a report
    pub async fn get_queue_position(&self, report_id: ReportId) -> Result<QueuePosition> {
        let url = format!("{}/report/{}/queue", self.base_url, report_id);
        let response = self.client.get(&url).send().await?;

        handle_response(response).await
    }
}
