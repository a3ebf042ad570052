//! Brand memory - logged generations and the rules learned from them.

use crate::api::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// `POST /memory/log` - record a generation event.
    pub async fn memory_log(
        &self,
        payload: &serde_json::Value,
    ) -> Result<serde_json::Value, ApiError> {
        self.post("/memory/log", payload).await
    }

    /// `GET /memory/rules` - learned brand rules.
    pub async fn memory_rules(&self) -> Result<serde_json::Value, ApiError> {
        self.get("/memory/rules").await
    }

    /// `GET /memory/status`.
    pub async fn memory_status(&self) -> Result<serde_json::Value, ApiError> {
        self.get("/memory/status").await
    }
}
