//! Pitch and outreach document generation.

use crate::api::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// `POST /pitch/cold-email`.
    pub async fn pitch_cold_email(
        &self,
        payload: &serde_json::Value,
    ) -> Result<serde_json::Value, ApiError> {
        self.post("/pitch/cold-email", payload).await
    }

    /// `POST /pitch/sales-pitch`.
    pub async fn pitch_sales_pitch(
        &self,
        payload: &serde_json::Value,
    ) -> Result<serde_json::Value, ApiError> {
        self.post("/pitch/sales-pitch", payload).await
    }

    /// `POST /pitch/proposal`.
    pub async fn pitch_proposal(
        &self,
        payload: &serde_json::Value,
    ) -> Result<serde_json::Value, ApiError> {
        self.post("/pitch/proposal", payload).await
    }
}
