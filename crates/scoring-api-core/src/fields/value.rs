//! Cleaned field values produced by successful validation

use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::fmt;

use super::kind::DATE_FORMAT;

/// Caller gender as encoded on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Unknown,
    Male,
    Female,
}

impl Gender {
    /// Decode a wire code (0, 1 or 2)
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(Gender::Unknown),
            1 => Some(Gender::Male),
            2 => Some(Gender::Female),
            _ => None,
        }
    }

    /// Wire code for this gender
    pub fn code(self) -> u8 {
        match self {
            Gender::Unknown => 0,
            Gender::Male => 1,
            Gender::Female => 2,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Unknown => write!(f, "unknown"),
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

/// A validated value for one schema field.
///
/// `Null` stands for an absent optional field as well as an empty value on a
/// nullable field; it is the only non-truthy value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Text(String),
    Arguments(Map<String, Value>),
    Phone(String),
    Date(NaiveDate),
    Gender(Gender),
    ClientIds(Vec<u64>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Whether the field carried a usable value
    pub fn is_truthy(&self) -> bool {
        !self.is_null()
    }

    /// Text content of `Text` and `Phone` values
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) | FieldValue::Phone(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(date) => Some(*date),
            _ => None,
        }
    }

    pub fn as_gender(&self) -> Option<Gender> {
        match self {
            FieldValue::Gender(gender) => Some(*gender),
            _ => None,
        }
    }

    pub fn as_client_ids(&self) -> Option<&[u64]> {
        match self {
            FieldValue::ClientIds(ids) => Some(ids),
            _ => None,
        }
    }

    pub fn as_arguments(&self) -> Option<&Map<String, Value>> {
        match self {
            FieldValue::Arguments(map) => Some(map),
            _ => None,
        }
    }

    /// Render back to JSON; dates use the `DD.MM.YYYY` wire format
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Text(s) | FieldValue::Phone(s) => Value::String(s.clone()),
            FieldValue::Arguments(map) => Value::Object(map.clone()),
            FieldValue::Date(date) => Value::String(date.format(DATE_FORMAT).to_string()),
            FieldValue::Gender(gender) => Value::from(gender.code()),
            FieldValue::ClientIds(ids) => Value::from(ids.clone()),
        }
    }
}
