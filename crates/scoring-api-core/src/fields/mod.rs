//! Field declarations and the per-field validation contract
//!
//! A [`FieldSpec`] pairs a [`FieldKind`] with two independent constraints:
//! `required` governs whether the key must be present, `nullable` governs
//! whether a present value may be empty. Checks run in a fixed order:
//!
//! 1. presence (`required`)
//! 2. emptiness (`nullable`)
//! 3. absent optional fields pass with a null value
//! 4. the kind-specific format check

pub mod kind;
pub mod value;

pub use kind::{json_type_name, FieldKind, DATE_FORMAT, MAX_AGE_YEARS};
pub use value::{FieldValue, Gender};

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::FieldError;

/// One field's constraints within a schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub kind: FieldKind,
    pub required: bool,
    pub nullable: bool,
}

impl FieldSpec {
    /// Create an optional, non-nullable field of the given kind
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            required: false,
            nullable: false,
        }
    }

    /// Require the key to be present
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Allow a present value to be empty
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Run the validation contract against a payload value.
    ///
    /// `value` is `None` when the key is missing from the payload, which is
    /// distinct from a present `null` or empty value.
    pub fn validate(&self, value: Option<&Value>, today: NaiveDate) -> Result<FieldValue, FieldError> {
        let Some(value) = value else {
            if self.required {
                return Err(FieldError::Required);
            }
            return Ok(FieldValue::Null);
        };

        if self.kind.is_empty(value) {
            if !self.nullable {
                return Err(FieldError::Empty);
            }
            return Ok(FieldValue::Null);
        }

        self.kind.check(value, today)
    }
}
