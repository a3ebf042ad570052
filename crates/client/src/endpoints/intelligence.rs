//! Business intelligence.

use crate::api::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// `POST /intelligence/weekly-brief`.
    pub async fn intelligence_weekly_brief(
        &self,
        payload: &serde_json::Value,
    ) -> Result<serde_json::Value, ApiError> {
        self.post("/intelligence/weekly-brief", payload).await
    }

    /// `GET /intelligence/dashboard-stats`.
    pub async fn intelligence_dashboard_stats(&self) -> Result<serde_json::Value, ApiError> {
        self.get("/intelligence/dashboard-stats").await
    }

    /// `GET /intelligence/opportunity-alerts`.
    pub async fn intelligence_opportunity_alerts(&self) -> Result<serde_json::Value, ApiError> {
        self.get("/intelligence/opportunity-alerts").await
    }
}
