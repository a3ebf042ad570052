//! Campaign copy generation.

use crate::api::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// `POST /campaigns/generate` - one-shot generation.
    pub async fn campaign_generate(
        &self,
        payload: &serde_json::Value,
    ) -> Result<serde_json::Value, ApiError> {
        self.post("/campaigns/generate", payload).await
    }

    /// `POST /campaigns/stream` - token-streamed generation. Tokens arrive
    /// through `on_token` in order; `on_done` fires exactly once.
    pub async fn campaign_stream<F, D>(
        &self,
        payload: &serde_json::Value,
        on_token: F,
        on_done: D,
    ) -> Result<(), ApiError>
    where
        F: FnMut(&str),
        D: FnOnce(),
    {
        self.post_stream("/campaigns/stream", payload, on_token, on_done)
            .await
    }
}
