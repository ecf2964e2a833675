//! Dynamic values observed by watchers.
//!
//! Scalars are plain data. Lists and objects are shared, mutable containers:
//! cloning a `Value` clones the handle, so every clone sees in-place
//! mutations and compares identical under reference comparison.
//! [`Value::deep_clone`] produces fresh allocations all the way down.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// Shared handle to a mutable list.
pub type List = Rc<RefCell<Vec<Value>>>;

/// Shared handle to a mutable object with ordered keys.
pub type Object = Rc<RefCell<BTreeMap<String, Value>>>;

/// Runtime value stored in a scope and produced by watch functions.
///
/// `PartialEq` is structural (deep) equality; watchers pick their own
/// comparison through [`crate::equality::are_equal`].
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Absent property
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(Rc<str>),
    List(List),
    Object(Object),
}

impl Value {
    pub fn undefined() -> Self {
        Value::Undefined
    }

    pub fn null() -> Self {
        Value::Null
    }

    pub fn bool(v: bool) -> Self {
        Value::Bool(v)
    }

    pub fn int(v: i64) -> Self {
        Value::Int(v)
    }

    pub fn float(v: f64) -> Self {
        Value::Float(v)
    }

    pub fn nan() -> Self {
        Value::Float(f64::NAN)
    }

    pub fn string(v: impl Into<String>) -> Self {
        Value::String(v.into().into())
    }

    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items.into_iter().collect())))
    }

    pub fn object(fields: impl IntoIterator<Item = (impl Into<String>, Value)>) -> Self {
        let fields = fields.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Value::Object(Rc::new(RefCell::new(fields)))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, Value::Float(v) if v.is_nan())
    }

    /// Falsy values are `Undefined`, `Null`, `false`, zero, NaN and the
    /// empty string. Containers are always truthy, even when empty.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(v) => *v != 0,
            Value::Float(v) => *v != 0.0 && !v.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::List(_) | Value::Object(_) => true,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view shared by `Int` and `Float`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(v) => Some(v),
            _ => None,
        }
    }

    /// Object field lookup; anything missing reads as `Undefined`.
    pub fn get(&self, key: &str) -> Value {
        self.as_object()
            .and_then(|fields| fields.borrow().get(key).cloned())
            .unwrap_or_default()
    }

    /// List element lookup; out of range reads as `Undefined`.
    pub fn get_index(&self, index: usize) -> Value {
        self.as_list()
            .and_then(|items| items.borrow().get(index).cloned())
            .unwrap_or_default()
    }

    /// Number of list items or object fields.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::List(items) => Some(items.borrow().len()),
            Value::Object(fields) => Some(fields.borrow().len()),
            _ => None,
        }
    }

    /// Append to a list in place. Returns `false` if this is not a list.
    pub fn push(&self, item: Value) -> bool {
        match self {
            Value::List(items) => {
                items.borrow_mut().push(item);
                true
            }
            _ => false,
        }
    }

    /// Overwrite a list element in place. Returns `false` if this is not a
    /// list or the index is out of range.
    pub fn set_index(&self, index: usize, item: Value) -> bool {
        match self {
            Value::List(items) => match items.borrow_mut().get_mut(index) {
                Some(slot) => {
                    *slot = item;
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    /// Set an object field in place. Returns `false` if this is not an object.
    pub fn insert(&self, key: impl Into<String>, item: Value) -> bool {
        match self {
            Value::Object(fields) => {
                fields.borrow_mut().insert(key.into(), item);
                true
            }
            _ => false,
        }
    }

    /// Copy with fresh list/object allocations at every level.
    ///
    /// Cyclic containers are not supported.
    pub fn deep_clone(&self) -> Value {
        match self {
            Value::List(items) => Value::list(items.borrow().iter().map(Value::deep_clone)),
            Value::Object(fields) => Value::object(
                fields
                    .borrow()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.deep_clone())),
            ),
            scalar => scalar.clone(),
        }
    }

    /// Convert into a `serde_json::Value`. `Undefined` and non-finite
    /// floats become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Undefined | Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(v) => serde_json::Value::from(*v),
            Value::Float(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.to_string()),
            Value::List(items) => {
                serde_json::Value::Array(items.borrow().iter().map(Value::to_json).collect())
            }
            Value::Object(fields) => serde_json::Value::Object(
                fields
                    .borrow()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        crate::equality::deep_equal(self, other)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) if v.is_nan() => f.write_str("NaN"),
            Value::Float(v) => write!(f, "{v}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Object(fields) => {
                f.write_str("{")?;
                for (i, (key, item)) in fields.borrow().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {item}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Undefined | Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(v) => serializer.serialize_i64(*v),
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::String(s) => serializer.serialize_str(s),
            Value::List(items) => {
                let items = items.borrow();
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(fields) => {
                let fields = fields.borrow();
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, item) in fields.iter() {
                    map.serialize_entry(key, item)?;
                }
                map.end()
            }
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(v) => Value::Int(v),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::string(s),
            serde_json::Value::Array(items) => Value::list(items.into_iter().map(Value::from)),
            serde_json::Value::Object(fields) => {
                Value::object(fields.into_iter().map(|(k, v)| (k, Value::from(v))))
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        i64::try_from(v).map_or(Value::Float(v as f64), Value::Int)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.into())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v.into())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items)))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Undefined, Into::into)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Undefined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_constructors() {
        assert_eq!(Value::int(42).as_int(), Some(42));
        assert_eq!(Value::bool(true).as_bool(), Some(true));
        assert_eq!(Value::string("hello").as_str(), Some("hello"));
        assert!(Value::undefined().is_undefined());
        assert!(Value::nan().is_nan());
    }

    #[test]
    fn test_clone_shares_container() {
        let list = Value::list([Value::int(1)]);
        let alias = list.clone();
        assert!(alias.push(Value::int(2)));
        assert_eq!(list.len(), Some(2));
        assert_eq!(list.get_index(1), Value::int(2));
    }

    #[test]
    fn test_deep_clone_detaches_container() {
        let inner = Value::list([Value::int(1)]);
        let outer = Value::object([("inner", inner.clone())]);
        let copy = outer.deep_clone();
        inner.push(Value::int(2));
        assert_eq!(outer.get("inner").len(), Some(2));
        assert_eq!(copy.get("inner").len(), Some(1));
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Undefined.is_truthy());
        assert!(!Value::Null.is_truthy());
        assert!(!Value::int(0).is_truthy());
        assert!(!Value::nan().is_truthy());
        assert!(!Value::string("").is_truthy());
        assert!(Value::string("JANE").is_truthy());
        assert!(Value::list([]).is_truthy());
    }

    #[test]
    fn test_missing_lookups_read_undefined() {
        let obj = Value::object([("a", Value::int(1))]);
        assert_eq!(obj.get("a"), Value::int(1));
        assert!(obj.get("b").is_undefined());
        assert!(Value::int(3).get("a").is_undefined());
        assert!(Value::list([]).get_index(0).is_undefined());
    }

    #[test]
    fn test_json_interop() {
        let json = serde_json::json!({"name": "Jane", "tags": [1, 2.5, null], "ok": true});
        let value = Value::from(json.clone());
        assert_eq!(value.get("name"), Value::string("Jane"));
        assert_eq!(value.get("tags").get_index(1), Value::float(2.5));
        assert_eq!(value.to_json(), json);
        assert_eq!(serde_json::to_value(&value).ok(), Some(json));
    }

    #[test]
    fn test_display() {
        let value = Value::object([("xs", Value::list([Value::int(1), Value::nan()]))]);
        assert_eq!(value.to_string(), "{xs: [1, NaN]}");
        assert_eq!(Value::string("J.").to_string(), "\"J.\"");
    }
}
