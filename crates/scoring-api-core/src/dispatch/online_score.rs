//! `online_score` method

use serde_json::{json, Map, Value};

use super::{CallContext, MethodHandler};
use crate::binder::BoundRequest;
use crate::error::{DispatchError, Result};
use crate::fields::FieldValue;
use crate::oracle::ScoreQuery;
use crate::schema;

/// Score returned to admin callers without consulting the oracle
pub const ADMIN_SCORE: u64 = 42;

/// Field pairs of which at least one must be fully populated
pub const REQUIRED_PAIRS: [(&str, &str); 3] = [
    ("phone", "email"),
    ("first_name", "last_name"),
    ("gender", "birthday"),
];

pub struct OnlineScoreHandler;

impl OnlineScoreHandler {
    fn has_complete_pair(arguments: &BoundRequest) -> bool {
        REQUIRED_PAIRS
            .iter()
            .any(|(a, b)| arguments.is_truthy(a) && arguments.is_truthy(b))
    }

    fn query(arguments: &BoundRequest) -> ScoreQuery {
        let text = |name| arguments.text(name).map(str::to_string);
        ScoreQuery {
            phone: text("phone"),
            email: text("email"),
            birthday: arguments.get("birthday").and_then(FieldValue::as_date),
            gender: arguments.get("gender").and_then(FieldValue::as_gender),
            first_name: text("first_name"),
            last_name: text("last_name"),
        }
    }
}

impl MethodHandler for OnlineScoreHandler {
    fn method(&self) -> &'static str {
        "online_score"
    }

    fn execute(&self, arguments: &Map<String, Value>, call: &mut CallContext<'_>) -> Result<Value> {
        let bound = schema::online_score().bind_at(arguments, call.today);
        if !bound.is_valid() {
            return Err(DispatchError::InvalidFields(bound.into_errors()));
        }

        if !Self::has_complete_pair(&bound) {
            return Err(DispatchError::CrossFieldRuleViolation {
                empty: bound.empty_fields(),
            });
        }

        call.execution.has = Some(
            bound
                .truthy_fields()
                .into_iter()
                .map(str::to_string)
                .collect(),
        );

        if call.is_admin {
            return Ok(Value::from(ADMIN_SCORE));
        }

        let score = call.oracle.get_score(&Self::query(&bound))?;
        Ok(json!(score))
    }
}
