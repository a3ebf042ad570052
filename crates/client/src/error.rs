//! Client error types.

use thiserror::Error;

/// Errors surfaced by the Skald API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response from the backend. `detail` is the upstream error
    /// payload (the JSON `detail` field when present, otherwise the raw body
    /// or status text), carried verbatim so callers can re-parse it.
    #[error("API error {status}: {detail}")]
    Status { status: u16, detail: String },

    /// Network-level failure (connect, timeout, broken transfer).
    #[error("Request failed: {0}")]
    Transport(String),

    /// Malformed frame on a token stream. Fatal to that stream.
    #[error("Stream protocol error: {0}")]
    Protocol(String),

    /// Session storage I/O error.
    #[error("Session store error: {0}")]
    Session(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(String),
}

impl ApiError {
    /// True when the error represents a rate-limited (429-class) response.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ApiError::Status { status: 429, .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Json(e.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        ApiError::Session(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::Status {
            status: 422,
            detail: "campaign name required".to_string(),
        };
        assert_eq!(err.to_string(), "API error 422: campaign name required");

        let err = ApiError::Protocol("bad frame".to_string());
        assert_eq!(err.to_string(), "Stream protocol error: bad frame");
    }

    #[test]
    fn test_rate_limited_predicate() {
        let limited = ApiError::Status {
            status: 429,
            detail: "slow down".to_string(),
        };
        assert!(limited.is_rate_limited());

        let not_limited = ApiError::Status {
            status: 500,
            detail: "boom".to_string(),
        };
        assert!(!not_limited.is_rate_limited());
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no session file");
        let err: ApiError = io_err.into();
        assert!(matches!(err, ApiError::Session(_)));
    }
}
