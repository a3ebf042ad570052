//! Sales-practice simulator.

use crate::api::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// `GET /simulator/personas` - available practice personas.
    pub async fn simulator_personas(&self) -> Result<serde_json::Value, ApiError> {
        self.get("/simulator/personas").await
    }

    /// `POST /simulator/message` - one turn of a practice conversation.
    pub async fn simulator_message(
        &self,
        payload: &serde_json::Value,
    ) -> Result<serde_json::Value, ApiError> {
        self.post("/simulator/message", payload).await
    }

    /// `POST /simulator/debrief` - coaching summary for a finished session.
    pub async fn simulator_debrief(
        &self,
        payload: &serde_json::Value,
    ) -> Result<serde_json::Value, ApiError> {
        self.post("/simulator/debrief", payload).await
    }
}
