//! HTTP handler for the scoring API
//!
//! - `routes`: the `POST /method` RPC endpoint, health check and error mapping
//! - `middleware`: request id propagation
//!
//! Every response body is JSON. RPC outcomes keep their own code in the body
//! and use the same value as the HTTP status.

pub mod middleware;
pub mod routes;

pub use middleware::{request_id_middleware, RequestId, REQUEST_ID_HEADER};
pub use routes::{health_check, method_handler, not_found, ApiError};

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use scoring_api_core::Dispatcher;
use tower_http::trace::TraceLayer;

/// State shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    /// Start time for uptime calculation
    pub start_time: Instant,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            start_time: Instant::now(),
        }
    }
}

/// Create the router with all routes
pub fn create_router(state: AppState, max_body_size: usize) -> Router {
    Router::new()
        .route("/method", post(method_handler))
        .route("/method/", post(method_handler))
        .route("/health", get(health_check))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
