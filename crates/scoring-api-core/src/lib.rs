//! Scoring API core
//!
//! Declarative request validation, caller authentication and method dispatch
//! for the Scoring API's single RPC endpoint.
//!
//! ## Architecture
//!
//! 1. **Fields** (`fields/`): field kinds, the required/nullable contract and
//!    cleaned values.
//! 2. **Schema** (`schema`): ordered field declarations for each request shape.
//! 3. **Binder** (`binder`): validates a raw JSON object against a schema,
//!    collecting every field error instead of stopping at the first.
//! 4. **Auth** (`auth`): SHA-512 token derivation and comparison.
//! 5. **Dispatch** (`dispatch/`): the request state machine and the
//!    `online_score` / `clients_interests` handlers.
//! 6. **Oracle** (`oracle`, `store`): the scoring lookup contract and an
//!    in-memory implementation.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use scoring_api_core::{account_token, AuthSecrets, Dispatcher, ExecutionContext, MemoryStore};
//! use serde_json::json;
//!
//! let dispatcher = Dispatcher::new(AuthSecrets::default(), Arc::new(MemoryStore::new()));
//! let body = json!({
//!     "account": "horns&hoofs",
//!     "login": "h&f",
//!     "method": "online_score",
//!     "token": account_token("horns&hoofs", "h&f", "Otus"),
//!     "arguments": {"phone": "79175002040", "email": "stupnikov@otus.ru"}
//! });
//!
//! let mut ctx = ExecutionContext::new("example");
//! let reply = dispatcher.handle(body.as_object().unwrap(), &mut ctx);
//! assert_eq!(reply.to_json(), json!({"response": 3.0, "code": 200}));
//! ```

pub mod auth;
pub mod binder;
pub mod clock;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod fields;
pub mod oracle;
pub mod schema;
pub mod store;

pub use auth::{account_token, admin_token, AuthContext, AuthSecrets, Authenticator};
pub use binder::{bind, BoundRequest};
pub use clock::{Clock, FixedClock, SystemClock};
pub use context::ExecutionContext;
pub use dispatch::{CallContext, Dispatcher, MethodHandler, Reply, ResponseCode};
pub use error::{DispatchError, FieldError, FieldErrors};
pub use fields::{FieldKind, FieldSpec, FieldValue, Gender};
pub use oracle::{OracleError, OracleResult, ScoreQuery, ScoringOracle};
pub use schema::Schema;
pub use store::MemoryStore;
