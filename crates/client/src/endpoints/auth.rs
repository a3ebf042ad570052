//! Authentication endpoints.
//!
//! Login and register persist the returned session to the injected store;
//! logout clears it. Token and user travel together in both directions, so
//! the store never holds one without the other.

use serde::{Deserialize, Serialize};

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::session::{Session, SessionUser};

/// Body for `POST /auth/login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body for `POST /auth/register`.
#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// What the auth endpoints return on success.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: SessionUser,
}

impl From<AuthResponse> for Session {
    fn from(resp: AuthResponse) -> Self {
        Session {
            token: resp.token,
            user: resp.user,
        }
    }
}

impl ApiClient {
    /// `POST /auth/login`. Persists the session on success.
    pub async fn login(&self, req: &LoginRequest) -> Result<Session, ApiError> {
        let value = self.post("/auth/login", &serde_json::to_value(req)?).await?;
        let resp: AuthResponse = serde_json::from_value(value)?;
        let session: Session = resp.into();
        self.session().store(&session)?;
        Ok(session)
    }

    /// `POST /auth/register`. Persists the session on success.
    pub async fn register(&self, req: &RegisterRequest) -> Result<Session, ApiError> {
        let value = self
            .post("/auth/register", &serde_json::to_value(req)?)
            .await?;
        let resp: AuthResponse = serde_json::from_value(value)?;
        let session: Session = resp.into();
        self.session().store(&session)?;
        Ok(session)
    }

    /// `GET /auth/me`.
    pub async fn me(&self) -> Result<serde_json::Value, ApiError> {
        self.get("/auth/me").await
    }

    /// Clear the persisted session. Local only; the bearer token is opaque
    /// to the client and simply stops being sent.
    pub fn logout(&self) -> Result<(), ApiError> {
        self.session().clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_response_parses_backend_shape() {
        let value = serde_json::json!({
            "token": "tok-xyz",
            "user": {"id": 3, "name": "Runa", "email": "runa@example.com"}
        });
        let resp: AuthResponse = serde_json::from_value(value).unwrap();
        assert_eq!(resp.token, "tok-xyz");
        assert_eq!(resp.user.email, "runa@example.com");

        let session: Session = resp.into();
        assert_eq!(session.token, "tok-xyz");
        assert_eq!(session.user.id, serde_json::json!(3));
    }

    #[test]
    fn test_login_request_wire_shape() {
        let req = LoginRequest {
            email: "a@b.c".to_string(),
            password: "hunter2".to_string(),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value, serde_json::json!({"email": "a@b.c", "password": "hunter2"}));
    }
}
