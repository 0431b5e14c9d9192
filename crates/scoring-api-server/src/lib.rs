//! Scoring API server
//!
//! Wires [`scoring_api_core::Dispatcher`] to an axum router, with TOML/flag
//! configuration and `tracing` logging.
//!
//! ```text
//! POST /method    JSON RPC call: {"account", "login", "method", "token", "arguments"}
//! GET  /health    liveness and version
//! ```

pub mod cli;
pub mod config;
pub mod handler;
pub mod logging;

pub use cli::ServeCli;
pub use config::{ConfigError, LogFormat, LoggingConfig, ServerConfig};
pub use handler::{create_router, AppState};
pub use logging::init_logging;

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use scoring_api_core::Dispatcher;
use tracing::{error, info};

/// Dispatcher backed by the in-memory store described in `config`
pub fn build_dispatcher(config: &ServerConfig) -> Result<Dispatcher, ConfigError> {
    let store = config.build_store()?;
    info!(clients = store.len(), "Loaded interest store");
    Ok(Dispatcher::new(config.auth.clone(), Arc::new(store)))
}

pub fn build_app(config: &ServerConfig) -> Result<Router, ConfigError> {
    let dispatcher = build_dispatcher(config)?;
    Ok(create_router(AppState::new(dispatcher), config.max_body_size))
}

/// Bind, serve until Ctrl-C, then drain in-flight requests
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let app = build_app(&config)?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("Starting server at {}", addr.port());
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
