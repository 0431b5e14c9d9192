//! Kind-specific format checks
//!
//! Each [`FieldKind`] validates a present, non-empty value. Kinds that refine
//! another kind run the base check first and apply their own rule to its
//! result: `Email` builds on `Char`, `BirthDay` builds on `Date`.

use chrono::NaiveDate;
use serde_json::Value;
use std::fmt;

use super::value::{FieldValue, Gender};
use crate::error::FieldError;

/// Wire format for date fields
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Exact length of a phone number's string form
pub const PHONE_LENGTH: usize = 11;

/// Leading digit of every accepted phone number
pub const PHONE_PREFIX: char = '7';

/// Oldest accepted age for birthday fields, in 365-day years
pub const MAX_AGE_YEARS: f64 = 70.0;

/// Field kinds supported by request schemas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Char,
    Arguments,
    Email,
    Phone,
    Date,
    BirthDay,
    Gender,
    ClientIds,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Char => write!(f, "char"),
            FieldKind::Arguments => write!(f, "arguments"),
            FieldKind::Email => write!(f, "email"),
            FieldKind::Phone => write!(f, "phone"),
            FieldKind::Date => write!(f, "date"),
            FieldKind::BirthDay => write!(f, "birthday"),
            FieldKind::Gender => write!(f, "gender"),
            FieldKind::ClientIds => write!(f, "client_ids"),
        }
    }
}

impl FieldKind {
    /// Whether a present value counts as empty for this kind.
    ///
    /// An empty client id list is not empty here: it must reach
    /// [`FieldKind::check`] and fail the non-empty rule whatever the
    /// field's nullability.
    pub fn is_empty(self, value: &Value) -> bool {
        match value {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::Array(items) => items.is_empty() && self != FieldKind::ClientIds,
            Value::Object(map) => map.is_empty(),
            Value::Bool(_) | Value::Number(_) => false,
        }
    }

    /// Validate a present value and produce its cleaned form
    pub fn check(self, value: &Value, today: NaiveDate) -> Result<FieldValue, FieldError> {
        match self {
            FieldKind::Char => expect_str(value).map(|s| FieldValue::Text(s.to_string())),
            FieldKind::Arguments => value
                .as_object()
                .map(|map| FieldValue::Arguments(map.clone()))
                .ok_or_else(|| type_mismatch("object", value)),
            FieldKind::Email => {
                let cleaned = FieldKind::Char.check(value, today)?;
                check_email(cleaned)
            }
            FieldKind::Phone => check_phone(value),
            FieldKind::Date => {
                let text = expect_str(value)?;
                NaiveDate::parse_from_str(text, DATE_FORMAT)
                    .map(FieldValue::Date)
                    .map_err(|e| FieldError::format(format!("date must be DD.MM.YYYY: {}", e)))
            }
            FieldKind::BirthDay => {
                let cleaned = FieldKind::Date.check(value, today)?;
                check_age(cleaned, today)
            }
            FieldKind::Gender => check_gender(value),
            FieldKind::ClientIds => check_client_ids(value),
        }
    }
}

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn type_mismatch(expected: &'static str, value: &Value) -> FieldError {
    FieldError::TypeMismatch {
        expected,
        actual: json_type_name(value),
    }
}

fn expect_str(value: &Value) -> Result<&str, FieldError> {
    value.as_str().ok_or_else(|| type_mismatch("string", value))
}

fn check_email(cleaned: FieldValue) -> Result<FieldValue, FieldError> {
    match cleaned.as_str() {
        Some(text) if text.contains('@') => Ok(cleaned),
        _ => Err(FieldError::format("email must contain '@'")),
    }
}

fn check_phone(value: &Value) -> Result<FieldValue, FieldError> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) if n.is_i64() || n.is_u64() => n.to_string(),
        _ => return Err(type_mismatch("string or integer", value)),
    };

    if text.chars().count() == PHONE_LENGTH && text.starts_with(PHONE_PREFIX) {
        Ok(FieldValue::Phone(text))
    } else {
        Err(FieldError::format(format!(
            "phone must be {} characters starting with '{}'",
            PHONE_LENGTH, PHONE_PREFIX
        )))
    }
}

fn check_age(cleaned: FieldValue, today: NaiveDate) -> Result<FieldValue, FieldError> {
    let Some(date) = cleaned.as_date() else {
        return Ok(cleaned);
    };

    let years = (today - date).num_days() as f64 / 365.0;
    if years > MAX_AGE_YEARS {
        return Err(FieldError::range("age limit exceeded"));
    }
    Ok(cleaned)
}

fn check_gender(value: &Value) -> Result<FieldValue, FieldError> {
    let Value::Number(n) = value else {
        return Err(type_mismatch("integer", value));
    };

    n.as_u64()
        .and_then(Gender::from_code)
        .map(FieldValue::Gender)
        .ok_or_else(|| FieldError::format("gender must be one of 0, 1, 2"))
}

fn check_client_ids(value: &Value) -> Result<FieldValue, FieldError> {
    let items = value.as_array().ok_or_else(|| type_mismatch("array", value))?;

    if items.is_empty() {
        return Err(FieldError::range("client_ids must not be empty"));
    }

    items
        .iter()
        .map(Value::as_u64)
        .collect::<Option<Vec<u64>>>()
        .map(FieldValue::ClientIds)
        .ok_or_else(|| FieldError::format("client_ids must contain non-negative integers"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_char_requires_string() {
        assert_eq!(
            FieldKind::Char.check(&json!("Ivan"), today()),
            Ok(FieldValue::Text("Ivan".to_string()))
        );
        assert_eq!(
            FieldKind::Char.check(&json!(42), today()),
            Err(FieldError::TypeMismatch {
                expected: "string",
                actual: "number"
            })
        );
    }

    #[test]
    fn test_email_builds_on_char() {
        assert!(FieldKind::Email.check(&json!("a@b.ru"), today()).is_ok());
        assert!(matches!(
            FieldKind::Email.check(&json!("otus.ru"), today()),
            Err(FieldError::FormatInvalid(_))
        ));
        // Char's type rule fires before the '@' rule
        assert!(matches!(
            FieldKind::Email.check(&json!(["a@b"]), today()),
            Err(FieldError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_phone_rules() {
        assert_eq!(
            FieldKind::Phone.check(&json!("79175002040"), today()),
            Ok(FieldValue::Phone("79175002040".to_string()))
        );
        assert_eq!(
            FieldKind::Phone.check(&json!(79175002040u64), today()),
            Ok(FieldValue::Phone("79175002040".to_string()))
        );
        assert!(matches!(
            FieldKind::Phone.check(&json!("88005553535"), today()),
            Err(FieldError::FormatInvalid(_))
        ));
        assert!(matches!(
            FieldKind::Phone.check(&json!(1.5), today()),
            Err(FieldError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_phone_requires_both_length_and_prefix() {
        // Each rule alone is insufficient
        assert!(FieldKind::Phone.check(&json!("7123"), today()).is_err());
        assert!(FieldKind::Phone.check(&json!("89175002040"), today()).is_err());
        assert!(FieldKind::Phone.check(&json!("791750020401"), today()).is_err());
    }

    #[test]
    fn test_date_parses_wire_format() {
        assert_eq!(
            FieldKind::Date.check(&json!("01.01.1990"), today()),
            Ok(FieldValue::Date(NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()))
        );
        assert!(matches!(
            FieldKind::Date.check(&json!("1990-01-01"), today()),
            Err(FieldError::FormatInvalid(_))
        ));
        assert!(matches!(
            FieldKind::Date.check(&json!("31.02.2000"), today()),
            Err(FieldError::FormatInvalid(_))
        ));
    }

    #[test]
    fn test_birthday_age_limit() {
        let later = NaiveDate::from_ymd_opt(2060, 1, 2).unwrap();
        assert_eq!(
            FieldKind::BirthDay.check(&json!("01.01.1990"), later),
            Err(FieldError::range("age limit exceeded"))
        );
        assert!(FieldKind::BirthDay.check(&json!("01.01.1990"), today()).is_ok());
        assert!(FieldKind::BirthDay.check(&json!("01.01.2020"), later).is_ok());
        assert!(matches!(
            FieldKind::BirthDay.check(&json!("XXX"), today()),
            Err(FieldError::FormatInvalid(_))
        ));
    }

    #[test]
    fn test_gender_values() {
        for code in 0..=2 {
            assert!(FieldKind::Gender.check(&json!(code), today()).is_ok());
        }
        assert!(matches!(
            FieldKind::Gender.check(&json!(3), today()),
            Err(FieldError::FormatInvalid(_))
        ));
        assert!(matches!(
            FieldKind::Gender.check(&json!(-1), today()),
            Err(FieldError::FormatInvalid(_))
        ));
        assert!(matches!(
            FieldKind::Gender.check(&json!("1"), today()),
            Err(FieldError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_client_ids() {
        assert_eq!(
            FieldKind::ClientIds.check(&json!([1, 2, 3, 4]), today()),
            Ok(FieldValue::ClientIds(vec![1, 2, 3, 4]))
        );
        assert!(matches!(
            FieldKind::ClientIds.check(&json!([]), today()),
            Err(FieldError::RangeInvalid(_))
        ));
        assert!(matches!(
            FieldKind::ClientIds.check(&json!([1, -2]), today()),
            Err(FieldError::FormatInvalid(_))
        ));
        assert!(matches!(
            FieldKind::ClientIds.check(&json!(["1"]), today()),
            Err(FieldError::FormatInvalid(_))
        ));
        assert!(matches!(
            FieldKind::ClientIds.check(&json!({"1": 2}), today()),
            Err(FieldError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_emptiness() {
        assert!(FieldKind::Char.is_empty(&json!("")));
        assert!(FieldKind::Arguments.is_empty(&json!({})));
        assert!(FieldKind::Char.is_empty(&Value::Null));
        assert!(!FieldKind::Gender.is_empty(&json!(0)));
        assert!(!FieldKind::ClientIds.is_empty(&json!([])));
    }
}
