//! Product catalog (the things campaigns are generated for).

use crate::api::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// `GET /products/`.
    pub async fn products_list(&self) -> Result<serde_json::Value, ApiError> {
        self.get("/products/").await
    }

    /// `POST /products/`.
    pub async fn products_create(
        &self,
        payload: &serde_json::Value,
    ) -> Result<serde_json::Value, ApiError> {
        self.post("/products/", payload).await
    }

    /// `DELETE /products/{id}`.
    pub async fn products_delete(&self, id: &str) -> Result<serde_json::Value, ApiError> {
        self.delete(&format!("/products/{}", id)).await
    }
}
