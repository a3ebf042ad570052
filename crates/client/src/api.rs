//! HTTP transport for the Skald backend.
//!
//! Every backend call in the workspace goes through [`ApiClient`], so bearer
//! injection and the retry policy are enforced in one place instead of per
//! call site. The client holds an injected [`SessionStore`]; the token is
//! read at call time, so a logout takes effect for subsequent calls while
//! in-flight calls keep the header they already attached.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};

use crate::error::ApiError;
use crate::policy::{retry_after, FailureKind};
use crate::session::SessionStore;
use crate::sse::{FrameParser, StreamFrame};

/// Deadline for one non-streaming attempt. Streaming reads carry none;
/// generation can legitimately run for minutes.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the Skald backend API.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    session: Arc<dyn SessionStore>,
}

impl ApiClient {
    /// Create a client for `base_url` using `session` for token lookup.
    pub fn new(base_url: impl Into<String>, session: Arc<dyn SessionStore>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::builder()
                .connect_timeout(CONNECT_TIMEOUT)
                .build()
                .unwrap_or_default(),
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    /// GET a JSON endpoint.
    pub async fn get(&self, path: &str) -> Result<serde_json::Value, ApiError> {
        self.request_json(Method::GET, path, None).await
    }

    /// POST a JSON body to an endpoint.
    pub async fn post(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, ApiError> {
        self.request_json(Method::POST, path, Some(body)).await
    }

    /// DELETE an endpoint.
    pub async fn delete(&self, path: &str) -> Result<serde_json::Value, ApiError> {
        self.request_json(Method::DELETE, path, None).await
    }

    /// One-shot multipart upload. Same auth injection, no JSON body, no
    /// retry loop (the form is consumed by the send).
    pub async fn post_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<serde_json::Value, ApiError> {
        let mut req = self
            .http
            .post(self.url(path))
            .timeout(REQUEST_TIMEOUT)
            .multipart(form);
        if let Some(token) = self.bearer()? {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await?;
        if !resp.status().is_success() {
            return Err(Self::status_error(resp).await);
        }
        Ok(resp.json().await?)
    }

    /// POST to a streaming endpoint and consume `data: {json}` frames.
    ///
    /// `on_token` fires synchronously per token, in arrival order. `on_done`
    /// fires exactly once per call, success or failure, after the last
    /// token. A `done` frame stops the read immediately; dropping the
    /// returned future aborts the transfer. Streaming calls are not retried.
    pub async fn post_stream<F, D>(
        &self,
        path: &str,
        body: &serde_json::Value,
        on_token: F,
        on_done: D,
    ) -> Result<(), ApiError>
    where
        F: FnMut(&str),
        D: FnOnce(),
    {
        let result = self.stream_inner(path, body, on_token).await;
        on_done();
        result
    }

    async fn stream_inner<F>(
        &self,
        path: &str,
        body: &serde_json::Value,
        mut on_token: F,
    ) -> Result<(), ApiError>
    where
        F: FnMut(&str),
    {
        let req = self.build_request(Method::POST, path, Some(body), false)?;
        let mut resp = self.http.execute(req).await?;
        if !resp.status().is_success() {
            return Err(Self::status_error(resp).await);
        }

        let mut parser = FrameParser::new();
        while let Some(chunk) = resp.chunk().await? {
            for frame in parser.push(&chunk)? {
                if let StreamFrame::Token(token) = frame {
                    on_token(&token);
                }
            }
            if parser.is_done() {
                // Dropping the response aborts the rest of the transfer.
                return Ok(());
            }
        }
        for frame in parser.finish()? {
            if let StreamFrame::Token(token) = frame {
                on_token(&token);
            }
        }
        Ok(())
    }

    /// Issue a JSON request under the retry policy: rate-limited responses
    /// back off linearly, network failures wait a flat interval, anything
    /// else surfaces immediately with the parsed upstream detail.
    async fn request_json(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value, ApiError> {
        let mut attempt: u32 = 1;
        loop {
            let req = self.build_request(method.clone(), path, body, true)?;
            let outcome = match self.http.execute(req).await {
                Ok(resp) if resp.status().is_success() => return Ok(resp.json().await?),
                Ok(resp) => {
                    let kind = if resp.status() == StatusCode::TOO_MANY_REQUESTS {
                        FailureKind::RateLimited
                    } else {
                        FailureKind::Application
                    };
                    (kind, Self::status_error(resp).await)
                }
                Err(e) => (FailureKind::Network, e.into()),
            };

            let (kind, err) = outcome;
            match retry_after(attempt, kind) {
                Some(delay) => {
                    tracing::warn!(
                        path,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                None => return Err(err),
            }
        }
    }

    /// Build one request: absolute URL, optional JSON body, bearer header
    /// when the store holds a session (omitted entirely otherwise).
    fn build_request(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
        bounded: bool,
    ) -> Result<reqwest::Request, ApiError> {
        let mut req = self.http.request(method, self.url(path));
        if bounded {
            req = req.timeout(REQUEST_TIMEOUT);
        }
        if let Some(body) = body {
            req = req.json(body);
        }
        if let Some(token) = self.bearer()? {
            req = req.bearer_auth(token);
        }
        req.build().map_err(ApiError::from)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn bearer(&self) -> Result<Option<String>, ApiError> {
        Ok(self.session.load()?.map(|s| s.token))
    }

    /// Turn a non-2xx response into [`ApiError::Status`]. The detail is the
    /// body's JSON `detail` field serialized back to JSON (so callers can
    /// re-parse it for structured display), the raw body when it is JSON
    /// without a `detail` field, or the status text for non-JSON bodies.
    async fn status_error(resp: reqwest::Response) -> ApiError {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        let detail = match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(value) => value.get("detail").unwrap_or(&value).to_string(),
            Err(_) => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        };
        ApiError::Status {
            status: status.as_u16(),
            detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MemorySessionStore, Session, SessionUser};

    fn logged_in_client() -> ApiClient {
        let session = Session {
            token: "tok-abc".to_string(),
            user: SessionUser {
                id: serde_json::json!(7),
                name: "Brand Lead".to_string(),
                email: "lead@example.com".to_string(),
            },
        };
        ApiClient::new(
            "http://localhost:8000/",
            Arc::new(MemorySessionStore::with_session(session)),
        )
    }

    fn anonymous_client() -> ApiClient {
        ApiClient::new("http://localhost:8000", Arc::new(MemorySessionStore::new()))
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = logged_in_client();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url("/auth/me"), "http://localhost:8000/auth/me");
    }

    #[test]
    fn test_bearer_header_attached_when_logged_in() {
        let client = logged_in_client();
        let req = client
            .build_request(Method::GET, "/auth/me", None, true)
            .unwrap();
        let auth = req.headers().get(reqwest::header::AUTHORIZATION).unwrap();
        assert_eq!(auth.to_str().unwrap(), "Bearer tok-abc");
    }

    #[test]
    fn test_bearer_header_omitted_when_logged_out() {
        let client = anonymous_client();
        let req = client
            .build_request(
                Method::POST,
                "/auth/login",
                Some(&serde_json::json!({"email": "a@b.c"})),
                true,
            )
            .unwrap();
        assert!(req.headers().get(reqwest::header::AUTHORIZATION).is_none());
    }

    #[test]
    fn test_json_body_sets_content_type() {
        let client = logged_in_client();
        let req = client
            .build_request(
                Method::POST,
                "/campaigns/generate",
                Some(&serde_json::json!({"product": "widget"})),
                true,
            )
            .unwrap();
        let ct = req.headers().get(reqwest::header::CONTENT_TYPE).unwrap();
        assert_eq!(ct.to_str().unwrap(), "application/json");
    }

    #[tokio::test]
    async fn test_stream_completion_fires_once_on_failure() {
        // Nothing listens on this port; the send fails, and the completion
        // callback must still fire exactly once.
        let client = ApiClient::new("http://127.0.0.1:9", Arc::new(MemorySessionStore::new()));
        let mut tokens = 0usize;
        let mut completions = 0usize;

        let result = client
            .post_stream(
                "/campaigns/stream",
                &serde_json::json!({"product": "widget"}),
                |_| tokens += 1,
                || completions += 1,
            )
            .await;

        assert!(matches!(result, Err(ApiError::Transport(_))));
        assert_eq!(tokens, 0);
        assert_eq!(completions, 1);
    }

    #[test]
    fn test_token_read_at_call_time() {
        let store = Arc::new(MemorySessionStore::new());
        let client = ApiClient::new("http://localhost:8000", store.clone());

        let req = client
            .build_request(Method::GET, "/auth/me", None, true)
            .unwrap();
        assert!(req.headers().get(reqwest::header::AUTHORIZATION).is_none());

        store
            .store(&Session {
                token: "fresh".to_string(),
                user: SessionUser {
                    id: serde_json::json!(1),
                    name: String::new(),
                    email: String::new(),
                },
            })
            .unwrap();

        let req = client
            .build_request(Method::GET, "/auth/me", None, true)
            .unwrap();
        assert_eq!(
            req.headers()
                .get(reqwest::header::AUTHORIZATION)
                .unwrap()
                .to_str()
                .unwrap(),
            "Bearer fresh"
        );
    }
}
