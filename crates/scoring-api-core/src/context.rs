//! Per-request execution context
//!
//! Filled in by the dispatcher and handlers for logging. One instance per
//! request; it is never shared between requests.

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionContext {
    /// Request id for correlation
    pub request_id: String,
    /// Whether the caller authenticated as admin
    pub is_admin: bool,
    /// Sorted names of online score fields that carried a value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has: Option<Vec<String>>,
    /// Number of client ids in an interests request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nclients: Option<usize>,
}

impl ExecutionContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            ..Default::default()
        }
    }
}
