//! Static asset serving with SPA fallback.
//!
//! Paths that name a file under the built asset directory are served with
//! their guessed content type. Everything else gets the SPA entry document
//! with a 200, so client-side routing handles arbitrary deep links.

use std::path::{Component, Path, PathBuf};

use axum::{
    body::Body,
    http::{header, Response, StatusCode, Uri},
};

/// Shared state for the static handler.
#[derive(Clone)]
pub struct SpaState {
    pub asset_dir: PathBuf,
    pub index_file: String,
}

impl SpaState {
    pub fn new(asset_dir: impl Into<PathBuf>, index_file: impl Into<String>) -> Self {
        Self {
            asset_dir: asset_dir.into(),
            index_file: index_file.into(),
        }
    }
}

/// Resolve a request path to a location inside the asset root. Returns None
/// for the root path and for anything that would escape the root (`..`,
/// absolute components).
fn resolve_asset(asset_dir: &Path, request_path: &str) -> Option<PathBuf> {
    let trimmed = request_path.trim_start_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    let relative = Path::new(trimmed);
    if !relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        return None;
    }
    Some(asset_dir.join(relative))
}

/// Serve a static asset or fall back to the entry document.
pub async fn serve(state: &SpaState, uri: &Uri) -> Response<Body> {
    if let Some(path) = resolve_asset(&state.asset_dir, uri.path()) {
        if let Ok(content) = tokio::fs::read(&path).await {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            return Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, mime.as_ref())
                .body(Body::from(content))
                .unwrap_or_else(|_| fallback_error());
        }
    }

    // SPA fallback: the entry document with a success status, whatever the
    // path was.
    let index_path = state.asset_dir.join(&state.index_file);
    match tokio::fs::read(&index_path).await {
        Ok(content) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
            .body(Body::from(content))
            .unwrap_or_else(|_| fallback_error()),
        Err(e) => {
            tracing::error!(index = %index_path.display(), "Failed to read SPA entry document: {}", e);
            Response::builder()
                .status(StatusCode::NOT_FOUND)
                .body(Body::from("not found"))
                .unwrap_or_else(|_| fallback_error())
        }
    }
}

fn fallback_error() -> Response<Body> {
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .body(Body::empty())
        .unwrap()
}
