//! Typed comparison values of the property condition
//!
//! On the wire, comparison values are typed by a parameter name suffix.
//! Exactly one singular family and one plural family are expected to be set;
//! when several are, the first non-null one wins in this order:
//! string, integer, double, date, date expression.

use super::types::Condition;
use crate::error::{CoreError, Result};
use crate::types::Value;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Singular value parameters, in priority order
pub const SINGLE_VALUE_PARAMETERS: [&str; 5] = [
    "propertyValue",
    "propertyValueInteger",
    "propertyValueDouble",
    "propertyValueDate",
    "propertyValueDateExpr",
];

/// Plural value parameters, in priority order
pub const MULTI_VALUE_PARAMETERS: [&str; 5] = [
    "propertyValues",
    "propertyValuesInteger",
    "propertyValuesDouble",
    "propertyValuesDate",
    "propertyValuesDateExpr",
];

/// A comparison value tagged with its family
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Str(String),
    Int(i64),
    Dbl(f64),
    Date(DateTime<Utc>),
    /// Relative date expression such as `now-7d/d`, resolved at comparison time
    DateExpr(String),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Name of the family, used in error messages
    pub fn family(&self) -> &'static str {
        match self {
            PropertyValue::Str(_) => "string",
            PropertyValue::Int(_) => "integer",
            PropertyValue::Dbl(_) => "double",
            PropertyValue::Date(_) => "date",
            PropertyValue::DateExpr(_) => "dateExpr",
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            PropertyValue::Str(s) => Value::String(s.clone()),
            PropertyValue::Int(i) => Value::Integer(*i),
            PropertyValue::Dbl(d) => Value::Number(*d),
            PropertyValue::Date(d) => Value::Date(*d),
            PropertyValue::DateExpr(e) => Value::String(e.clone()),
        }
    }

    fn parse(family: usize, parameter: &str, value: &Value) -> Result<Self> {
        match family {
            0 => match value {
                Value::Array(_) | Value::Object(_) | Value::Condition(_) => Err(
                    CoreError::invalid_parameter(parameter, format!("expected a scalar, got {}", value.type_name())),
                ),
                Value::String(s) => Ok(PropertyValue::Str(s.clone())),
                other => Ok(PropertyValue::Str(other.to_display_string())),
            },
            1 => value.as_i64().map(PropertyValue::Int).ok_or_else(|| {
                CoreError::invalid_parameter(parameter, format!("expected an integer, got {}", value.type_name()))
            }),
            2 => value.as_f64().map(PropertyValue::Dbl).ok_or_else(|| {
                CoreError::invalid_parameter(parameter, format!("expected a double, got {}", value.type_name()))
            }),
            3 => parse_date_value(value).map(PropertyValue::Date).ok_or_else(|| {
                CoreError::invalid_parameter(
                    parameter,
                    format!("expected an ISO-8601 date or epoch millis, got {}", value.to_display_string()),
                )
            }),
            _ => match value {
                Value::String(s) => Ok(PropertyValue::DateExpr(s.clone())),
                other => Err(CoreError::invalid_parameter(
                    parameter,
                    format!("expected a date expression, got {}", other.type_name()),
                )),
            },
        }
    }
}

/// The comparison values of one property condition
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComparisonValues {
    /// First non-null singular value
    pub value: Option<PropertyValue>,
    /// First non-null plural value list
    pub values: Option<Vec<PropertyValue>>,
}

impl ComparisonValues {
    /// Extract the typed comparison values of a condition
    pub fn from_condition(condition: &Condition) -> Result<Self> {
        let mut value = None;
        for (family, parameter) in SINGLE_VALUE_PARAMETERS.iter().enumerate() {
            if let Some(raw) = condition.parameter(parameter) {
                value = Some(PropertyValue::parse(family, parameter, raw)?);
                break;
            }
        }

        let mut values = None;
        for (family, parameter) in MULTI_VALUE_PARAMETERS.iter().enumerate() {
            if let Some(raw) = condition.parameter(parameter) {
                let items = raw.as_array().ok_or_else(|| {
                    CoreError::invalid_parameter(parameter, format!("expected a list, got {}", raw.type_name()))
                })?;
                let parsed = items
                    .iter()
                    .filter(|item| !item.is_null())
                    .map(|item| PropertyValue::parse(family, parameter, item))
                    .collect::<Result<Vec<_>>>()?;
                values = Some(parsed);
                break;
            }
        }

        Ok(Self { value, values })
    }

    /// The singular value when it belongs to the string family
    pub fn string_value(&self) -> Option<&str> {
        self.value.as_ref().and_then(|v| v.as_str())
    }
}

/// Parse an absolute date: a date value, epoch millis, or an ISO-8601 string
/// (with or without offset, time part optional). Naive values are taken as UTC.
pub fn parse_date_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Date(d) => Some(*d),
        Value::Integer(millis) => Utc.timestamp_millis_opt(*millis).single(),
        Value::String(s) => parse_iso_date(s),
        _ => None,
    }
}

/// Parse an ISO-8601 date string, or a string of epoch millis
pub fn parse_iso_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(d) = DateTime::parse_from_rfc3339(s) {
        return Some(d.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| Utc.from_utc_datetime(&naive));
    }
    if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
        return s.parse::<i64>().ok().and_then(|millis| Utc.timestamp_millis_opt(millis).single());
    }
    None
}
