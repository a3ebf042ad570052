//! Lead scoring and outreach.

use reqwest::multipart::{Form, Part};

use crate::api::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// `POST /leads/score` - score a single lead.
    pub async fn leads_score(
        &self,
        payload: &serde_json::Value,
    ) -> Result<serde_json::Value, ApiError> {
        self.post("/leads/score", payload).await
    }

    /// `POST /leads/score-batch` - upload a lead file (CSV) for batch
    /// scoring. Multipart, single attempt.
    pub async fn leads_score_batch(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<serde_json::Value, ApiError> {
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part("file", part);
        self.post_multipart("/leads/score-batch", form).await
    }

    /// `POST /leads/outreach` - draft outreach for a scored lead.
    pub async fn leads_outreach(
        &self,
        payload: &serde_json::Value,
    ) -> Result<serde_json::Value, ApiError> {
        self.post("/leads/outreach", payload).await
    }
}
