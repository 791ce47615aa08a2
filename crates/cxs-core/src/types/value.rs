//! Runtime value types for CXS conditions
//!
//! The `Value` enum represents every value a condition parameter, an item
//! field or a context entry can hold. It mirrors JSON, with a few additions:
//! integers are kept apart from floating point numbers, dates are first-class,
//! and nested conditions (e.g. the `subConditions` of a boolean condition) are
//! carried as their own variant so they stay opaque to parameter resolution.

use crate::condition::Condition;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Runtime value type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Number(f64),
    /// String value
    String(String),
    /// Date value (never produced by JSON deserialization, strings stay strings)
    Date(DateTime<Utc>),
    /// Array of values
    Array(Vec<Value>),
    /// Nested condition
    Condition(Box<Condition>),
    /// Object (key-value map)
    Object(HashMap<String, Value>),
}

impl Value {
    /// Returns true for `Value::Null`
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer view of the value. Floats without a fractional part and
    /// numeric strings are accepted.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Number(n) if n.fract() == 0.0 && n.is_finite() => Some(*n as i64),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    /// Floating point view of the value. Integers and numeric strings are accepted.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Number(n) => Some(*n),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::Date(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_condition(&self) -> Option<&Condition> {
        match self {
            Value::Condition(c) => Some(c),
            _ => None,
        }
    }

    /// Name of the variant, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::Array(_) => "array",
            Value::Condition(_) => "condition",
            Value::Object(_) => "object",
        }
    }

    /// Textual form used by string operators (`contains`, `startsWith`, ...)
    /// when the compared value is not a string.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            Value::Date(d) => d.to_rfc3339_opts(SecondsFormat::Millis, true),
            Value::Array(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.to_display_string()).collect();
                format!("[{}]", parts.join(", "))
            }
            Value::Condition(c) => c.condition_type_id.clone(),
            Value::Object(_) => "{object}".to_string(),
        }
    }

    /// Convert into a plain JSON value. Dates become ISO-8601 strings.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Integer(i) => serde_json::Value::from(*i),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Date(d) => {
                serde_json::Value::String(d.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(|v| v.to_json()).collect())
            }
            Value::Condition(c) => {
                serde_json::to_value(c.as_ref()).unwrap_or(serde_json::Value::Null)
            }
            Value::Object(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                // `{"type": ..}` with optional `parameterValues` and nothing else
                let is_condition = map.get("type").map(|t| t.is_string()).unwrap_or(false)
                    && match map.get("parameterValues") {
                        Some(parameters) => map.len() == 2 && parameters.is_object(),
                        None => map.len() == 1,
                    };
                if is_condition {
                    if let Ok(condition) =
                        serde_json::from_value::<Condition>(serde_json::Value::Object(map.clone()))
                    {
                        return Value::Condition(Box::new(condition));
                    }
                }
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
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

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i as i64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(d)
    }
}

impl From<Condition> for Value {
    fn from(c: Condition) -> Self {
        Value::Condition(Box::new(c))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl From<HashMap<String, Value>> for Value {
    fn from(map: HashMap<String, Value>) -> Self {
        Value::Object(map)
    }
}
