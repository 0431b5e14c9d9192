//! Method dispatch
//!
//! Every request walks the same path:
//!
//! ```text
//! Received -> EnvelopeValidated -> Authenticated -> MethodResolved -> HandlerExecuted
//! ```
//!
//! Each step can end the request: an invalid envelope or unknown method
//! yields `422`, a bad token `403`, and an oracle failure `500`.

pub mod clients_interests;
pub mod online_score;

use chrono::NaiveDate;
use serde_json::{json, Map, Value};
use std::fmt;
use std::sync::Arc;

use crate::auth::{AuthSecrets, Authenticator};
use crate::clock::{Clock, SystemClock};
use crate::context::ExecutionContext;
use crate::error::{DispatchError, Result};
use crate::fields::FieldValue;
use crate::oracle::ScoringOracle;
use crate::schema;

/// Response codes used on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseCode {
    Ok,
    BadRequest,
    Forbidden,
    NotFound,
    InvalidRequest,
    InternalError,
}

impl ResponseCode {
    /// Numeric HTTP status
    pub fn as_u16(self) -> u16 {
        match self {
            ResponseCode::Ok => 200,
            ResponseCode::BadRequest => 400,
            ResponseCode::Forbidden => 403,
            ResponseCode::NotFound => 404,
            ResponseCode::InvalidRequest => 422,
            ResponseCode::InternalError => 500,
        }
    }

    /// Canned phrase used when no error detail is given
    pub fn reason(self) -> &'static str {
        match self {
            ResponseCode::Ok => "OK",
            ResponseCode::BadRequest => "Bad Request",
            ResponseCode::Forbidden => "Forbidden",
            ResponseCode::NotFound => "Not Found",
            ResponseCode::InvalidRequest => "Invalid Request",
            ResponseCode::InternalError => "Internal Server Error",
        }
    }

    pub fn is_success(self) -> bool {
        self == ResponseCode::Ok
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason())
    }
}

/// Outcome of handling one request
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub code: ResponseCode,
    /// Handler result on success, error detail otherwise
    pub body: Option<Value>,
}

impl Reply {
    pub fn ok(result: Value) -> Self {
        Self {
            code: ResponseCode::Ok,
            body: Some(result),
        }
    }

    /// Error reply; `None` detail falls back to the code's canned phrase
    pub fn error(code: ResponseCode, detail: Option<Value>) -> Self {
        Self { code, body: detail }
    }

    pub fn from_error(error: &DispatchError) -> Self {
        Self::error(error.response_code(), error.detail())
    }

    /// Wire body: `{"response", "code"}` on success, `{"error", "code"}` otherwise
    pub fn to_json(&self) -> Value {
        let code = self.code.as_u16();
        if self.code.is_success() {
            json!({
                "response": self.body.clone().unwrap_or(Value::Null),
                "code": code,
            })
        } else {
            json!({
                "error": self
                    .body
                    .clone()
                    .unwrap_or_else(|| Value::String(self.code.reason().to_string())),
                "code": code,
            })
        }
    }
}

/// Everything a handler may use while executing one call
pub struct CallContext<'a> {
    pub oracle: &'a dyn ScoringOracle,
    pub is_admin: bool,
    pub today: NaiveDate,
    pub execution: &'a mut ExecutionContext,
}

/// A named RPC method
pub trait MethodHandler: Send + Sync {
    /// Method name as sent in the envelope
    fn method(&self) -> &'static str;

    /// Validate `arguments` and produce the method's result
    fn execute(&self, arguments: &Map<String, Value>, call: &mut CallContext<'_>) -> Result<Value>;
}

/// Routes validated, authenticated envelopes to method handlers
pub struct Dispatcher {
    authenticator: Authenticator,
    oracle: Arc<dyn ScoringOracle>,
    clock: Arc<dyn Clock>,
    handlers: Vec<Box<dyn MethodHandler>>,
}

impl Dispatcher {
    /// Create a dispatcher with the default methods and the system clock
    pub fn new(secrets: AuthSecrets, oracle: Arc<dyn ScoringOracle>) -> Self {
        let mut dispatcher = Self {
            authenticator: Authenticator::new(secrets),
            oracle,
            clock: Arc::new(SystemClock),
            handlers: Vec::new(),
        };
        dispatcher.register_default_handlers();
        dispatcher
    }

    fn register_default_handlers(&mut self) {
        self.register(Box::new(online_score::OnlineScoreHandler));
        self.register(Box::new(clients_interests::ClientsInterestsHandler));
    }

    /// Replace the clock used for token hours and age checks
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Register a method handler; a later handler shadows an earlier one
    /// with the same method name
    pub fn register(&mut self, handler: Box<dyn MethodHandler>) {
        self.handlers.retain(|h| h.method() != handler.method());
        self.handlers.push(handler);
    }

    /// Names of all registered methods
    pub fn methods(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.method()).collect()
    }

    fn handler(&self, method: &str) -> Option<&dyn MethodHandler> {
        self.handlers
            .iter()
            .find(|h| h.method() == method)
            .map(|h| h.as_ref())
    }

    /// Handle one request body and render the outcome
    pub fn handle(&self, body: &Map<String, Value>, ctx: &mut ExecutionContext) -> Reply {
        match self.dispatch(body, ctx) {
            Ok(result) => Reply::ok(result),
            Err(error) => {
                match &error {
                    DispatchError::Oracle(_) => tracing::error!(
                        request_id = %ctx.request_id,
                        error = %error,
                        "Unexpected failure while handling request"
                    ),
                    _ => tracing::info!(
                        request_id = %ctx.request_id,
                        code = error.error_code(),
                        error = %error,
                        "Request rejected"
                    ),
                }
                Reply::from_error(&error)
            }
        }
    }

    /// Run the request state machine, returning the handler result
    pub fn dispatch(&self, body: &Map<String, Value>, ctx: &mut ExecutionContext) -> Result<Value> {
        let now = self.clock.now();
        let today = now.date();

        let envelope = schema::method_envelope().bind_at(body, today);
        if !envelope.is_valid() {
            return Err(DispatchError::InvalidFields(envelope.into_errors()));
        }

        let auth = self.authenticator.context(&envelope);
        self.authenticator.authenticate(&auth, now)?;
        ctx.is_admin = auth.is_admin;

        let method = envelope.text("method").unwrap_or_default();
        let handler = self
            .handler(method)
            .ok_or_else(|| DispatchError::UnknownMethod(method.to_string()))?;

        let empty = Map::new();
        let arguments = envelope
            .get("arguments")
            .and_then(FieldValue::as_arguments)
            .unwrap_or(&empty);

        tracing::debug!(request_id = %ctx.request_id, method, "Dispatching");

        let mut call = CallContext {
            oracle: self.oracle.as_ref(),
            is_admin: auth.is_admin,
            today,
            execution: ctx,
        };
        handler.execute(arguments, &mut call)
    }
}
