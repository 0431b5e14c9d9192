//! `clients_interests` method

use serde_json::{Map, Value};

use super::{CallContext, MethodHandler};
use crate::error::{DispatchError, Result};
use crate::fields::FieldValue;
use crate::schema;

pub struct ClientsInterestsHandler;

impl MethodHandler for ClientsInterestsHandler {
    fn method(&self) -> &'static str {
        "clients_interests"
    }

    fn execute(&self, arguments: &Map<String, Value>, call: &mut CallContext<'_>) -> Result<Value> {
        let bound = schema::clients_interests().bind_at(arguments, call.today);
        if !bound.is_valid() {
            return Err(DispatchError::InvalidFields(bound.into_errors()));
        }

        // `date` is validated but the interest lookup does not take it
        let client_ids = bound
            .get("client_ids")
            .and_then(FieldValue::as_client_ids)
            .unwrap_or_default();

        call.execution.nclients = Some(client_ids.len());

        let mut interests = Map::new();
        for &client_id in client_ids {
            let found = call.oracle.get_interests(client_id)?;
            interests.insert(client_id.to_string(), Value::from(found));
        }
        Ok(Value::Object(interests))
    }
}
