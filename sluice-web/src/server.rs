//! HTTP server wiring
//!
//! Builds the application state for the selected runtime mode, exposes
//! the router for tests, and runs the listener until Ctrl+C.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::routing::get;
use sluice_core::{Acquirer, MediaRegistry, RuntimeMode, SluiceConfig};
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::handlers::{fetch_media, home_page, player_page, stream_media};

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    /// Runs acquisitions against the configured engine.
    pub acquirer: Arc<Acquirer>,
    /// Maps delivery tokens to acquired files.
    pub registry: MediaRegistry,
}

impl AppState {
    /// Builds state for the given runtime mode: the real download
    /// engine in production, the simulated one in demo mode.
    pub fn new(config: &SluiceConfig, mode: RuntimeMode) -> Self {
        let acquirer = match mode {
            RuntimeMode::Production => Acquirer::new(config.fetch.clone()),
            RuntimeMode::Demo => Acquirer::simulated(config.fetch.clone()),
        };

        Self {
            acquirer: Arc::new(acquirer),
            registry: MediaRegistry::new(),
        }
    }

    /// Builds state around a preassembled orchestrator.
    pub fn with_acquirer(acquirer: Acquirer) -> Self {
        Self {
            acquirer: Arc::new(acquirer),
            registry: MediaRegistry::new(),
        }
    }
}

/// Builds the application router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home_page))
        .route("/fetch", get(fetch_media))
        .route("/player/{token}", get(player_page))
        .route("/stream/{token}", get(stream_media))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Runs the server until Ctrl+C.
///
/// # Errors
/// Returns an error when the listener cannot bind or the server loop
/// fails; an unreachable download engine only logs a warning, since
/// demo mode and late engine installs are both legitimate.
pub async fn run_server(config: SluiceConfig, mode: RuntimeMode) -> anyhow::Result<()> {
    let state = AppState::new(&config, mode);

    if let Err(e) = state.acquirer.check_engine().await {
        warn!("download engine probe failed: {e}");
    }

    let app = router(state);
    let addr = format!("{}:{}", config.http.host, config.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    info!("Sluice media server running on http://{addr} in {mode} mode");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("running server")?;

    info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!("failed to install Ctrl+C handler: {e}");
    }
}
