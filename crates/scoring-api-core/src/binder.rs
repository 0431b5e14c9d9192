//! Binding raw payloads to schemas
//!
//! Binding always completes: every declared field lands in exactly one of
//! `cleaned` or `errors`, and validation failures are returned as data.

use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::{FieldError, FieldErrors};
use crate::fields::FieldValue;
use crate::schema::Schema;

/// Result of validating one payload against one schema
#[derive(Debug, Clone, PartialEq)]
pub struct BoundRequest {
    schema: &'static str,
    cleaned: BTreeMap<&'static str, FieldValue>,
    errors: FieldErrors,
}

impl BoundRequest {
    /// Name of the schema this request was bound against
    pub fn schema(&self) -> &'static str {
        self.schema
    }

    /// A request is usable by handlers only when no field failed
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn cleaned(&self) -> &BTreeMap<&'static str, FieldValue> {
        &self.cleaned
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Cleaned value of a field, if it validated
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.cleaned.get(name)
    }

    /// Text of a `Char`-like field; null and failed fields read as `None`
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_str)
    }

    /// Whether a field validated to a non-null value
    pub fn is_truthy(&self, name: &str) -> bool {
        self.get(name).is_some_and(FieldValue::is_truthy)
    }

    /// Names of fields that carried a value, sorted
    pub fn truthy_fields(&self) -> Vec<&'static str> {
        self.cleaned
            .iter()
            .filter(|(_, value)| value.is_truthy())
            .map(|(name, _)| *name)
            .collect()
    }

    /// Names of fields that validated to null, sorted
    pub fn empty_fields(&self) -> Vec<&'static str> {
        self.cleaned
            .iter()
            .filter(|(_, value)| value.is_null())
            .map(|(name, _)| *name)
            .collect()
    }

    /// Cleaned values rendered back to JSON, keyed by field name
    pub fn cleaned_json(&self) -> Value {
        Value::Object(
            self.cleaned
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_json()))
                .collect(),
        )
    }

    /// Consume the request, keeping only the field errors
    pub fn into_errors(self) -> FieldErrors {
        self.errors
    }
}

/// Validate every field of `schema` against `payload`.
///
/// Fields are checked in declared order and no failure stops the pass, so
/// the result reports every violation at once.
pub fn bind(schema: &Schema, payload: &Map<String, Value>, today: NaiveDate) -> BoundRequest {
    let mut cleaned = BTreeMap::new();
    let mut errors: BTreeMap<&'static str, FieldError> = BTreeMap::new();

    for (name, spec) in schema.fields() {
        match spec.validate(payload.get(name), today) {
            Ok(value) => {
                cleaned.insert(name, value);
            }
            Err(error) => {
                errors.insert(name, error);
            }
        }
    }

    let bound = BoundRequest {
        schema: schema.name(),
        cleaned,
        errors,
    };

    tracing::debug!(
        schema = bound.schema,
        cleaned = %bound.cleaned_json(),
        errors = bound.errors.len(),
        "Payload bound"
    );

    bound
}
