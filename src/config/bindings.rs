//! Named typed values resolved from the parameter file.
//!
//! A [`Bindings`] starts out holding the schema defaults and is overwritten
//! as a whole by each successful [`Reconciler::reconcile`]. It is an owned
//! value handed to whoever needs the parameters.
//!
//! [`Reconciler::reconcile`]: crate::config::Reconciler::reconcile

use indexmap::IndexMap;
use serde::Serialize;

use crate::config::schema::Schema;
use crate::config::value::Value;
use crate::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Bindings {
    values: IndexMap<String, Value>,
}

impl Bindings {
    /// Bindings holding every schema default, in declaration order.
    pub fn from_schema(schema: &Schema) -> Self {
        let values = schema
            .entries()
            .map(|(_, field)| (field.name.clone(), field.default.clone()))
            .collect();
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_float)
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn list(&self, name: &str) -> Option<&[String]> {
        self.get(name).and_then(Value::as_list)
    }

    pub fn require_int(&self, name: &str) -> Result<i64> {
        self.int(name).ok_or_else(|| self.binding_error(name, "int"))
    }

    pub fn require_float(&self, name: &str) -> Result<f64> {
        self.float(name)
            .ok_or_else(|| self.binding_error(name, "float"))
    }

    pub fn require_string(&self, name: &str) -> Result<&str> {
        self.string(name)
            .ok_or_else(|| self.binding_error(name, "string"))
    }

    pub fn require_list(&self, name: &str) -> Result<&[String]> {
        self.list(name)
            .ok_or_else(|| self.binding_error(name, "string list"))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Only the reconciler writes bindings.
    pub(crate) fn set(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    fn binding_error(&self, name: &str, expected: &str) -> Error {
        match self.get(name) {
            Some(value) => Error::Binding(format!(
                "{} is a {}, expected {}",
                name,
                value.tag(),
                expected
            )),
            None => Error::Binding(format!("{} is not bound", name)),
        }
    }
}
