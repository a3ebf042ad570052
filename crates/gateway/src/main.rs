use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, Response},
    Router,
};
use dotenvy::dotenv;
use tracing_subscriber::EnvFilter;

mod config;
mod proxy;
mod routes;
mod spa;

use crate::config::GatewayConfig;
use crate::proxy::ProxyState;
use crate::spa::SpaState;

/// Everything the dispatch handler needs, built once at startup.
struct AppState {
    proxy: ProxyState,
    spa: SpaState,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = GatewayConfig::load()?;

    let state = Arc::new(AppState {
        proxy: ProxyState::new(config.backend.base_url.clone(), config.backend.timeout_secs),
        spa: SpaState::new(config.assets.dir.clone(), config.assets.index.clone()),
    });

    // Every request goes through one dispatcher: allow-listed prefixes are
    // proxied, everything else is the SPA.
    let app = Router::new().fallback(dispatch).with_state(state);

    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port).parse()?;
    tracing::info!(%addr, backend = %config.backend.base_url, "starting Skald gateway");
    tracing::info!(
        "Proxied prefixes: {} -> {}",
        routes::API_PREFIXES.join(", "),
        config.backend.base_url
    );
    tracing::info!(assets = %config.assets.dir, "SPA fallback: {}", config.assets.index);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await?;

    tracing::info!("Gateway stopped");
    Ok(())
}

async fn dispatch(State(state): State<Arc<AppState>>, req: Request<Body>) -> Response<Body> {
    match routes::proxied_prefix(req.uri().path()) {
        Some(_) => proxy::forward(&state.proxy, req).await,
        None => spa::serve(&state.spa, req.uri()).await,
    }
}
