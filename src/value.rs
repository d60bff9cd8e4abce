use std::fmt;

use indexmap::IndexMap;
use serde_json::Value as JsonValue;

/// An insertion-ordered parameter mapping.
///
/// Both the input handed to the extractor and the mapping it produces use this
/// type. Iteration order is the order in which keys were first inserted.
pub type Params = IndexMap<String, Value>;

/// A dynamically typed parameter value.
///
/// Request parameters arrive without a schema: query strings carry text, JSON
/// bodies carry numbers, booleans and nested structures. `Value` captures every
/// shape a parameter can take so coercion can match on it exhaustively.
///
/// A key that is missing from [`Params`] and a key mapped to [`Value::Null`] are
/// treated the same way by the extractor ("absent").
///
/// # Examples
///
/// ```
/// use request_params::Value;
///
/// let v = Value::from("42");
/// assert_eq!(v.as_str(), Some("42"));
/// assert!(Value::Null.is_null());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Explicit null
    Null,
    /// Boolean flag
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Floating point number
    Decimal(f64),
    /// Text
    String(String),
    /// Ordered list of values
    Sequence(Vec<Value>),
    /// Nested key/value mapping
    Mapping(Params),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the text of a [`Value::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer of a [`Value::Int`].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the elements of a [`Value::Sequence`].
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entries of a [`Value::Mapping`].
    pub fn as_mapping(&self) -> Option<&Params> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Short name of the variant, used in log fields.
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Decimal(_) => "decimal",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
        }
    }
}

impl fmt::Display for Value {
    /// Renders scalars as plain text and collections as JSON.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::String(s) => f.write_str(s),
            Value::Sequence(_) | Value::Mapping(_) => {
                write!(f, "{}", JsonValue::from(self.clone()))
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Decimal(d)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<Params> for Value {
    fn from(map: Params) -> Self {
        Value::Mapping(map)
    }
}

impl From<JsonValue> for Value {
    /// Converts decoded JSON into a parameter value.
    ///
    /// Numbers that fit in `i64` become [`Value::Int`]; every other number
    /// (fractions, exponents, values above `i64::MAX`) becomes [`Value::Decimal`].
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Decimal).unwrap_or(Value::Null),
            },
            JsonValue::String(s) => Value::String(s),
            JsonValue::Array(items) => Value::Sequence(items.into_iter().map(Value::from).collect()),
            JsonValue::Object(map) => Value::Mapping(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for JsonValue {
    /// Converts a parameter value back into JSON.
    ///
    /// Non-finite decimals have no JSON representation and become `null`.
    fn from(value: Value) -> Self {
        match value {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(b),
            Value::Int(i) => JsonValue::from(i),
            Value::Decimal(d) => serde_json::Number::from_f64(d)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Value::String(s) => JsonValue::String(s),
            Value::Sequence(items) => {
                JsonValue::Array(items.into_iter().map(JsonValue::from).collect())
            }
            Value::Mapping(map) => JsonValue::Object(
                map.into_iter()
                    .map(|(k, v)| (k, JsonValue::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Builds [`Params`] from a JSON object.
///
/// Returns `None` when `json` is not an object.
///
/// # Examples
///
/// ```
/// use request_params::{params_from_json, Value};
///
/// let params = params_from_json(serde_json::json!({"age": "41", "admin": false})).unwrap();
/// assert_eq!(params.get("age"), Some(&Value::from("41")));
/// ```
pub fn params_from_json(json: JsonValue) -> Option<Params> {
    match Value::from(json) {
        Value::Mapping(map) => Some(map),
        _ => None,
    }
}
