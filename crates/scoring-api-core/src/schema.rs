//! Declarative request schemas
//!
//! A [`Schema`] is an ordered list of named [`FieldSpec`]s. The three request
//! shapes the service understands are process-wide constants built once on
//! first use.

use chrono::{Local, NaiveDate};
use serde_json::{Map, Value};
use std::sync::OnceLock;

use crate::binder::{bind, BoundRequest};
use crate::fields::{FieldKind, FieldSpec};

/// Ordered set of field declarations describing one request shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    name: &'static str,
    fields: Vec<(&'static str, FieldSpec)>,
}

impl Schema {
    /// Build a schema from ordered `(name, spec)` pairs.
    ///
    /// A repeated name replaces the earlier spec in place, so each name
    /// appears once.
    pub fn new<I>(name: &'static str, fields: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, FieldSpec)>,
    {
        let mut declared: Vec<(&'static str, FieldSpec)> = Vec::new();
        for (field_name, spec) in fields {
            match declared.iter_mut().find(|(existing, _)| *existing == field_name) {
                Some(slot) => slot.1 = spec,
                None => declared.push((field_name, spec)),
            }
        }

        Self {
            name,
            fields: declared,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Field declarations in declared order
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &FieldSpec)> {
        self.fields.iter().map(|(name, spec)| (*name, spec))
    }

    /// Look up a field declaration by name
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields
            .iter()
            .find(|(field_name, _)| *field_name == name)
            .map(|(_, spec)| spec)
    }

    /// Validate a payload using today's local date for age checks
    pub fn bind(&self, payload: &Map<String, Value>) -> BoundRequest {
        self.bind_at(payload, Local::now().date_naive())
    }

    /// Validate a payload against this schema as of `today`
    pub fn bind_at(&self, payload: &Map<String, Value>, today: NaiveDate) -> BoundRequest {
        bind(self, payload, today)
    }
}

/// Outer request wrapper: credentials, method name and opaque arguments
pub fn method_envelope() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::new(
            "method_envelope",
            [
                ("account", FieldSpec::new(FieldKind::Char).nullable()),
                ("login", FieldSpec::new(FieldKind::Char).required().nullable()),
                ("token", FieldSpec::new(FieldKind::Char).required().nullable()),
                (
                    "arguments",
                    FieldSpec::new(FieldKind::Arguments).required().nullable(),
                ),
                ("method", FieldSpec::new(FieldKind::Char).required()),
            ],
        )
    })
}

/// Arguments of the `online_score` method
pub fn online_score() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::new(
            "online_score",
            [
                ("first_name", FieldSpec::new(FieldKind::Char).nullable()),
                ("last_name", FieldSpec::new(FieldKind::Char).nullable()),
                ("email", FieldSpec::new(FieldKind::Email).nullable()),
                ("phone", FieldSpec::new(FieldKind::Phone).nullable()),
                ("birthday", FieldSpec::new(FieldKind::BirthDay).nullable()),
                ("gender", FieldSpec::new(FieldKind::Gender).nullable()),
            ],
        )
    })
}

/// Arguments of the `clients_interests` method
pub fn clients_interests() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        Schema::new(
            "clients_interests",
            [
                ("client_ids", FieldSpec::new(FieldKind::ClientIds).required()),
                ("date", FieldSpec::new(FieldKind::Date).nullable()),
            ],
        )
    })
}
