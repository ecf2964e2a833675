//! Key/value environment that watchers observe and listeners mutate.

use rustc_hash::FxHashMap;

use crate::error::ContextError;
use crate::value::Value;

/// Open-ended property bag backing a [`crate::Scope`].
///
/// Reads of missing keys produce [`Value::Undefined`], so a watch on a
/// property that was never set behaves like any other watched value.
#[derive(Debug, Clone, Default)]
pub struct Context {
    values: FxHashMap<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a context from a JSON object, one property per top-level key.
    pub fn from_json(json: serde_json::Value) -> Result<Self, ContextError> {
        match json {
            serde_json::Value::Object(fields) => Ok(fields
                .into_iter()
                .map(|(key, value)| (key, Value::from(value)))
                .collect()),
            other => Err(ContextError::NotAnObject {
                found: json_kind(&other),
            }),
        }
    }

    /// Read a property. Containers are returned as shared handles.
    pub fn get(&self, key: &str) -> Value {
        self.values.get(key).cloned().unwrap_or_default()
    }

    pub fn get_ref(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Write a property, returning the previous value if there was one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    /// Apply `update` to the current value (or `Undefined`) and store the result.
    pub fn update(&mut self, key: &str, update: impl FnOnce(&Value) -> Value) {
        let next = update(self.values.get(key).unwrap_or(&Value::Undefined));
        self.values.insert(key.to_string(), next);
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn json_kind(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
