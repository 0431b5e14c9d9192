//! Route handlers
//!
//! - POST /method - JSON RPC dispatch
//! - GET /health - liveness and version

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Extension, Json,
};
use scoring_api_core::{ExecutionContext, Reply, ResponseCode};
use serde_json::{json, Value};
use tracing::{error, info, warn};

use super::{AppState, RequestId};

/// Transport-level failures that never reach the dispatcher
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl ApiError {
    pub fn response_code(&self) -> ResponseCode {
        match self {
            ApiError::BadRequest(_) => ResponseCode::BadRequest,
            ApiError::NotFound(_) => ResponseCode::NotFound,
            ApiError::Internal(_) => ResponseCode::InternalError,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.response_code().as_u16())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::BadRequest(detail) | ApiError::NotFound(detail) => {
                warn!(code = self.response_code().as_u16(), detail = %detail, "request rejected");
            }
            ApiError::Internal(detail) => {
                error!(detail = %detail, "request failed");
            }
        }

        // Detail stays in the log; the body carries only the canned phrase
        let reply = Reply::error(self.response_code(), None);
        (self.status_code(), Json(reply.to_json())).into_response()
    }
}

/// POST /method - validate, authenticate and dispatch one RPC call
pub async fn method_handler(
    State(state): State<AppState>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    uri: Uri,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let body = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    info!(
        request_id = %request_id,
        path = %uri.path(),
        body = %String::from_utf8_lossy(&body),
        "request received"
    );

    let payload = match serde_json::from_slice::<Value>(&body) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            return Err(ApiError::BadRequest(format!(
                "body must be a JSON object, got {}",
                scoring_api_core::fields::json_type_name(&other)
            )))
        }
        Err(e) => return Err(ApiError::BadRequest(format!("invalid JSON: {}", e))),
    };

    let dispatcher = Arc::clone(&state.dispatcher);
    let mut ctx = ExecutionContext::new(request_id);
    let (reply, ctx) = tokio::task::spawn_blocking(move || {
        let reply = dispatcher.handle(&payload, &mut ctx);
        (reply, ctx)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("dispatch task failed: {}", e)))?;

    info!(
        request_id = %ctx.request_id,
        context = ?ctx,
        code = reply.code.as_u16(),
        "request complete"
    );

    let status =
        StatusCode::from_u16(reply.code.as_u16()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Ok((status, Json(reply.to_json())).into_response())
}

/// GET /health - health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "methods": state.dispatcher.methods(),
        "uptime_seconds": state.start_time.elapsed().as_secs(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Fallback for unknown paths
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("no route for {}", uri.path()))
}
