//! Transparent proxy for forwarding API requests to the Skald backend.
//!
//! Any request whose path is on the allow-list (see [`crate::routes`]) is
//! forwarded verbatim: same method, headers, query string and body. The
//! response is relayed back as a stream, so the backend's token-streaming
//! endpoint works through the gateway, with one change: every proxied
//! response carries a permissive cross-origin header.
//!
//! The gateway performs no authentication and no path rewriting. It is a
//! dumb forwarder; the backend owns everything else.

use axum::{
    body::Body,
    http::{header, HeaderValue, Request, Response, StatusCode},
};

/// Shared state for the proxy handler.
#[derive(Clone)]
pub struct ProxyState {
    pub backend_base_url: String,
    pub http_client: reqwest::Client,
}

impl ProxyState {
    pub fn new(backend_base_url: String, timeout_secs: u64) -> Self {
        Self {
            backend_base_url,
            // Connect and per-read timeouts rather than a whole-request
            // deadline: the backend's token streams have no bounded total
            // duration, but a silent upstream must still surface as a
            // gateway error instead of hanging.
            http_client: reqwest::Client::builder()
                .connect_timeout(std::time::Duration::from_secs(10))
                .read_timeout(std::time::Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
        }
    }
}

/// Build the upstream URL for a request path + query string.
fn target_url(base: &str, path: &str, query: Option<&str>) -> String {
    let base = base.trim_end_matches('/');
    match query {
        Some(q) => format!("{}{}?{}", base, path, q),
        None => format!("{}{}", base, path),
    }
}

/// Forward one request to the backend and relay the response.
pub async fn forward(state: &ProxyState, req: Request<Body>) -> Response<Body> {
    let (parts, body) = req.into_parts();
    let full_url = target_url(&state.backend_base_url, parts.uri.path(), parts.uri.query());

    tracing::debug!(target_url = %full_url, method = %parts.method, "Proxying request to backend");

    // Buffer the inbound body; 10 MB is the gateway's ceiling, uploads past
    // that belong on a direct backend connection.
    let body_bytes = match axum::body::to_bytes(body, 10 * 1024 * 1024).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!("Failed to read request body: {}", e);
            return error_response(StatusCode::BAD_REQUEST, "Failed to read request body");
        }
    };

    // Forward headers verbatim. Host belongs to the gateway's origin and
    // content-length is recomputed from the buffered body.
    let mut forwarded_headers = parts.headers.clone();
    forwarded_headers.remove(header::HOST);
    forwarded_headers.remove(header::CONTENT_LENGTH);

    let mut proxy_req = state
        .http_client
        .request(parts.method.clone(), &full_url)
        .headers(forwarded_headers);

    if !body_bytes.is_empty() {
        proxy_req = proxy_req.body(body_bytes);
    }

    let proxy_response = match proxy_req.send().await {
        Ok(resp) => resp,
        Err(e) if e.is_timeout() => {
            tracing::error!("Backend timed out: {}", e);
            return error_response(StatusCode::GATEWAY_TIMEOUT, "Backend timed out");
        }
        Err(e) => {
            tracing::error!("Proxy request failed: {}", e);
            return error_response(StatusCode::BAD_GATEWAY, "Backend unreachable");
        }
    };

    let status = proxy_response.status();
    let mut response_builder = Response::builder().status(status);

    // Relay response headers, minus hop-by-hop framing (the streamed body
    // is re-framed on the way out) and any upstream CORS header (replaced
    // below).
    if let Some(headers) = response_builder.headers_mut() {
        for (name, value) in proxy_response.headers() {
            if name == header::TRANSFER_ENCODING
                || name == header::CONNECTION
                || name == header::ACCESS_CONTROL_ALLOW_ORIGIN
            {
                continue;
            }
            headers.append(name.clone(), value.clone());
        }
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        );
    }

    response_builder
        .body(Body::from_stream(proxy_response.bytes_stream()))
        .unwrap_or_else(|_| {
            Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body(Body::from("Failed to build response"))
                .unwrap()
        })
}

fn error_response(status: StatusCode, message: &str) -> Response<Body> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .header(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        )
        .body(Body::from(format!(r#"{{"error": "{}"}}"#, message)))
        .unwrap_or_else(|_| {
            Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body(Body::empty())
                .unwrap()
        })
}
