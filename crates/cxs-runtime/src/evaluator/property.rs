//! In-memory property comparison
//!
//! The property may hold one value or a list. Positive operators match when
//! any element satisfies them; `notEquals`, `notContains` and `isNotDay` are
//! the negation of their positive form. An absent or null property only
//! satisfies `missing`; an empty list is present and has no elements, so only
//! `exists` and the negative operators hold for it.
//!
//! Strings are compared ASCII folded on both sides. Integer, double and date
//! comparison values compare numerically or chronologically.

use super::{ConditionEvaluator, EvalScope};
use crate::comparison::{DistanceParameters, PropertyComparison};
use crate::context::Context;
use crate::dates::{day_window, property_value_date, resolve_date};
use crate::error::{Result, RuntimeError};
use crate::fold::fold_to_ascii;
use chrono::{DateTime, FixedOffset, Utc};
use cxs_core::{ComparisonOperator, Condition, GeoPoint, Item, PropertyValue, Value};
use regex::Regex;
use std::cmp::Ordering;

#[derive(Debug, Default)]
pub struct PropertyConditionEvaluator;

impl ConditionEvaluator for PropertyConditionEvaluator {
    fn eval(&self, condition: &Condition, item: &Item, _context: &Context, scope: &EvalScope<'_>) -> Result<bool> {
        let comparison = PropertyComparison::from_condition(condition)?;
        let Some(actual) = actual_values(item, comparison.property_name) else {
            return Ok(comparison.operator == ComparisonOperator::Missing);
        };

        let dates = DateContext {
            now: Utc::now(),
            timezone: scope.options().timezone,
        };

        use ComparisonOperator as Op;
        match comparison.operator {
            Op::Exists => Ok(true),
            Op::Missing => Ok(false),
            Op::Equals | Op::NotEquals => {
                let expected = comparison.required_value()?;
                let equal = actual
                    .iter()
                    .any(|a| dates.compare(a, expected) == Some(Ordering::Equal));
                Ok(equal == (comparison.operator == Op::Equals))
            }
            Op::GreaterThan | Op::GreaterThanOrEqualTo | Op::LessThan | Op::LessThanOrEqualTo => {
                let expected = comparison.required_value()?;
                let accepts = |ordering: Ordering| match comparison.operator {
                    Op::GreaterThan => ordering == Ordering::Greater,
                    Op::GreaterThanOrEqualTo => ordering != Ordering::Less,
                    Op::LessThan => ordering == Ordering::Less,
                    _ => ordering != Ordering::Greater,
                };
                Ok(actual
                    .iter()
                    .filter_map(|a| dates.compare(a, expected))
                    .any(accepts))
            }
            Op::Between => {
                let (low, high) = comparison.required_bounds()?;
                Ok(actual.iter().any(|a| {
                    matches!(dates.compare(a, low), Some(Ordering::Greater | Ordering::Equal))
                        && matches!(dates.compare(a, high), Some(Ordering::Less | Ordering::Equal))
                }))
            }
            Op::Contains | Op::NotContains | Op::StartsWith | Op::EndsWith => {
                let expected = fold_to_ascii(comparison.required_string()?);
                let found = actual.iter().map(folded_text).any(|a| match comparison.operator {
                    Op::StartsWith => a.starts_with(&expected),
                    Op::EndsWith => a.ends_with(&expected),
                    _ => a.contains(&expected),
                });
                Ok(found != (comparison.operator == Op::NotContains))
            }
            Op::MatchesRegex => {
                let pattern = fold_to_ascii(comparison.required_string()?);
                let regex = Regex::new(&format!("^(?:{})$", pattern))
                    .map_err(|e| RuntimeError::illegal_argument(format!("invalid regex '{}': {}", pattern, e)))?;
                Ok(actual.iter().map(folded_text).any(|a| regex.is_match(&a)))
            }
            Op::In | Op::NotIn | Op::All | Op::HasSomeOf | Op::HasNoneOf => {
                let expected = comparison.required_values()?;
                let present = |e: &PropertyValue| {
                    actual
                        .iter()
                        .any(|a| dates.compare(a, e) == Some(Ordering::Equal))
                };
                Ok(match comparison.operator {
                    Op::In | Op::HasSomeOf => expected.iter().any(present),
                    Op::All => expected.iter().all(present),
                    _ => !expected.iter().any(present),
                })
            }
            Op::InContains => {
                let expected = comparison.required_values()?;
                let actual: Vec<String> = actual.iter().map(folded_text).collect();
                Ok(expected.iter().all(|e| {
                    let e = fold_to_ascii(&e.to_value().to_display_string());
                    actual.iter().any(|a| a.contains(&e))
                }))
            }
            Op::IsDay | Op::IsNotDay => {
                let expected = comparison.required_value()?;
                let day = property_value_date(expected, dates.now, &dates.timezone)
                    .ok_or_else(|| invalid_date(&comparison, expected))?;
                let (start, end) = day_window(&day, &dates.timezone)
                    .ok_or_else(|| invalid_date(&comparison, expected))?;
                let same_day = actual
                    .iter()
                    .filter_map(|a| resolve_date(a, dates.now, &dates.timezone))
                    .any(|d| start <= d && d < end);
                Ok(same_day == (comparison.operator == Op::IsDay))
            }
            Op::Distance => {
                let distance = DistanceParameters::from_condition(condition)?;
                Ok(actual
                    .iter()
                    .filter_map(GeoPoint::from_value)
                    .any(|point| point.distance_to(&distance.center) <= distance.meters))
            }
        }
    }
}

/// Non-null values of a property, list elements flattened. `None` when the
/// property is absent or null.
fn actual_values(item: &Item, property_name: &str) -> Option<Vec<Value>> {
    match item.get_value(property_name)? {
        Value::Array(items) => Some(items.into_iter().filter(|v| !v.is_null()).collect()),
        value => Some(vec![value]),
    }
}

fn folded_text(value: &Value) -> String {
    fold_to_ascii(&value.to_display_string())
}

fn invalid_date(comparison: &PropertyComparison<'_>, value: &PropertyValue) -> RuntimeError {
    RuntimeError::illegal_argument(format!(
        "invalid {} date value '{}' for condition using operator: {} and property: {}",
        value.family(),
        value.to_value().to_display_string(),
        comparison.operator,
        comparison.property_name
    ))
}

struct DateContext {
    now: DateTime<Utc>,
    timezone: FixedOffset,
}

impl DateContext {
    /// Order an actual value against a comparison value, `None` when the two
    /// cannot be compared
    fn compare(&self, actual: &Value, expected: &PropertyValue) -> Option<Ordering> {
        match expected {
            PropertyValue::Str(s) => Some(folded_text(actual).cmp(&fold_to_ascii(s))),
            PropertyValue::Int(i) => match actual {
                Value::Integer(a) => Some(a.cmp(i)),
                other => other.as_f64()?.partial_cmp(&(*i as f64)),
            },
            PropertyValue::Dbl(d) => actual.as_f64()?.partial_cmp(d),
            PropertyValue::Date(_) | PropertyValue::DateExpr(_) => {
                let expected = property_value_date(expected, self.now, &self.timezone)?;
                let actual = resolve_date(actual, self.now, &self.timezone)?;
                Some(actual.cmp(&expected))
            }
        }
    }
}
