//! Competitor analysis.

use crate::api::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// `POST /competitor/analyse`.
    pub async fn competitor_analyse(
        &self,
        payload: &serde_json::Value,
    ) -> Result<serde_json::Value, ApiError> {
        self.post("/competitor/analyse", payload).await
    }

    /// `GET /competitor/weekly-digest`.
    pub async fn competitor_weekly_digest(&self) -> Result<serde_json::Value, ApiError> {
        self.get("/competitor/weekly-digest").await
    }
}
