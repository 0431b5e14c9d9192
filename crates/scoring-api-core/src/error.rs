//! Error types for request validation and dispatch
//!
//! Field-level failures ([`FieldError`]) are collected by the binder and never
//! propagate as control flow. Request-level failures ([`DispatchError`]) end
//! the request and map onto a [`ResponseCode`].

use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::dispatch::ResponseCode;
use crate::oracle::OracleError;

/// A single field's validation failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Required key missing from the payload
    #[error("field is required")]
    Required,

    /// Present value is empty and the field is not nullable
    #[error("field cannot be empty")]
    Empty,

    /// Value has the wrong JSON type for the field kind
    #[error("expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// Value has the right type but an invalid shape or content
    #[error("{0}")]
    FormatInvalid(String),

    /// Value is well-formed but outside the accepted range
    #[error("{0}")]
    RangeInvalid(String),
}

impl FieldError {
    /// Create a format error
    pub fn format(msg: impl Into<String>) -> Self {
        FieldError::FormatInvalid(msg.into())
    }

    /// Create a range error
    pub fn range(msg: impl Into<String>) -> Self {
        FieldError::RangeInvalid(msg.into())
    }

    /// Get the error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            FieldError::Required => "FIELD_REQUIRED",
            FieldError::Empty => "FIELD_EMPTY",
            FieldError::TypeMismatch { .. } => "FIELD_TYPE_MISMATCH",
            FieldError::FormatInvalid(_) => "FIELD_FORMAT_INVALID",
            FieldError::RangeInvalid(_) => "FIELD_RANGE_INVALID",
        }
    }
}

impl Serialize for FieldError {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Per-field errors keyed by field name
pub type FieldErrors = BTreeMap<&'static str, FieldError>;

/// Failures that terminate a request before a result is produced
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Payload failed schema validation
    #[error("invalid request: {} field error(s)", .0.len())]
    InvalidFields(FieldErrors),

    /// None of the required field pairs is fully populated
    #[error(
        "at least one of the pairs (phone, email), (first_name, last_name), (gender, birthday) \
         must be non-empty; empty: {}",
        .empty.join(", ")
    )]
    CrossFieldRuleViolation { empty: Vec<&'static str> },

    /// Token does not match the expected digest
    #[error("authentication failed for login '{login}'")]
    AuthenticationFailed { login: String },

    /// Method name has no registered handler
    #[error("unknown method: {0}")]
    UnknownMethod(String),

    /// The scoring oracle failed
    #[error("scoring oracle failed: {0}")]
    Oracle(#[from] OracleError),
}

impl DispatchError {
    /// Response code this failure maps onto
    pub fn response_code(&self) -> ResponseCode {
        match self {
            DispatchError::InvalidFields(_)
            | DispatchError::CrossFieldRuleViolation { .. }
            | DispatchError::UnknownMethod(_) => ResponseCode::InvalidRequest,
            DispatchError::AuthenticationFailed { .. } => ResponseCode::Forbidden,
            DispatchError::Oracle(_) => ResponseCode::InternalError,
        }
    }

    /// Get the error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            DispatchError::InvalidFields(_) => "INVALID_FIELDS",
            DispatchError::CrossFieldRuleViolation { .. } => "CROSS_FIELD_RULE",
            DispatchError::AuthenticationFailed { .. } => "AUTHENTICATION_FAILED",
            DispatchError::UnknownMethod(_) => "UNKNOWN_METHOD",
            DispatchError::Oracle(_) => "INTERNAL_ERROR",
        }
    }

    /// Caller-visible error detail.
    ///
    /// `None` means the canned phrase for the response code is used, so
    /// credentials and internal failures never leak to the caller.
    pub fn detail(&self) -> Option<Value> {
        match self {
            DispatchError::InvalidFields(errors) => serde_json::to_value(errors).ok(),
            DispatchError::CrossFieldRuleViolation { .. } | DispatchError::UnknownMethod(_) => {
                Some(Value::String(self.to_string()))
            }
            DispatchError::AuthenticationFailed { .. } | DispatchError::Oracle(_) => None,
        }
    }
}

/// Result type alias for dispatch operations
pub type Result<T> = std::result::Result<T, DispatchError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_error_display() {
        assert_eq!(FieldError::Required.to_string(), "field is required");
        assert_eq!(FieldError::Empty.to_string(), "field cannot be empty");

        let err = FieldError::TypeMismatch {
            expected: "string",
            actual: "number",
        };
        assert_eq!(err.to_string(), "expected string, got number");
    }

    #[test]
    fn test_field_error_serializes_as_message() {
        let err = FieldError::range("age limit exceeded");
        assert_eq!(serde_json::to_value(&err).unwrap(), json!("age limit exceeded"));
    }

    #[test]
    fn test_invalid_fields_detail_is_field_map() {
        let mut errors = FieldErrors::new();
        errors.insert("login", FieldError::Required);
        errors.insert("method", FieldError::Empty);

        let err = DispatchError::InvalidFields(errors);
        assert_eq!(err.response_code(), ResponseCode::InvalidRequest);
        assert_eq!(
            err.detail(),
            Some(json!({
                "login": "field is required",
                "method": "field cannot be empty",
            }))
        );
    }

    #[test]
    fn test_forbidden_and_internal_hide_detail() {
        let err = DispatchError::AuthenticationFailed {
            login: "h&f".to_string(),
        };
        assert_eq!(err.response_code(), ResponseCode::Forbidden);
        assert!(err.detail().is_none());

        let err = DispatchError::Oracle(OracleError::Unavailable("redis down".to_string()));
        assert_eq!(err.response_code(), ResponseCode::InternalError);
        assert!(err.detail().is_none());
    }

    #[test]
    fn test_unknown_method_names_method() {
        let err = DispatchError::UnknownMethod("foo".to_string());
        assert_eq!(err.detail(), Some(json!("unknown method: foo")));
    }
}
