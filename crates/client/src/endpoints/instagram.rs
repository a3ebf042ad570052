//! Instagram post generation pipeline.

use crate::api::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// `POST /instagram/generate`.
    pub async fn instagram_generate(
        &self,
        payload: &serde_json::Value,
    ) -> Result<serde_json::Value, ApiError> {
        self.post("/instagram/generate", payload).await
    }

    /// `GET /instagram/pipeline-steps` - the step names the UI animates
    /// while a post is being generated.
    pub async fn instagram_pipeline_steps(&self) -> Result<serde_json::Value, ApiError> {
        self.get("/instagram/pipeline-steps").await
    }
}
