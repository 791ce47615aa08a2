//! Property comparison filters
//!
//! | operator | filter |
//! |---|---|
//! | `equals` / `notEquals` | `term` / `must_not` term |
//! | `greaterThan` .. `lessThanOrEqualTo` | `range` with one bound |
//! | `between` | `range` gte first value, lte second value |
//! | `exists` / `missing` | `exists` / `must_not` exists |
//! | `contains` / `notContains` | `regexp .*v.*` / `must_not` of it |
//! | `startsWith` / `endsWith` | `prefix` / `regexp .*v` |
//! | `matchesRegex` | `regexp` as given |
//! | `in` / `notIn` | `terms` / `must_not` terms |
//! | `all` / `inContains` | one `must` term / `.*v.*` regexp per value |
//! | `hasSomeOf` / `hasNoneOf` | one `should` / `must_not` term per value |
//! | `isDay` / `isNotDay` | `range` over the day / `must_not` of it |
//! | `distance` | `geo_distance` |
//!
//! String values are ASCII folded, dates are rendered in ISO-8601.

use super::{BuildScope, ConditionQueryBuilder, QueryFragment, RangeBounds};
use crate::comparison::{DistanceParameters, PropertyComparison};
use crate::context::Context;
use crate::dates::{day_window, format_iso, property_value_date};
use crate::error::{Result, RuntimeError};
use crate::fold::fold_to_ascii;
use chrono::Utc;
use cxs_core::{ComparisonOperator, Condition, PropertyValue, Value};

#[derive(Debug, Default)]
pub struct PropertyConditionQueryBuilder;

impl ConditionQueryBuilder for PropertyConditionQueryBuilder {
    fn build_query(&self, condition: &Condition, _context: &Context, scope: &BuildScope<'_>) -> Result<QueryFragment> {
        let comparison = PropertyComparison::from_condition(condition)?;
        let name = comparison.property_name;

        use ComparisonOperator as Op;
        let fragment = match comparison.operator {
            Op::Equals => QueryFragment::term(name, query_value(comparison.required_value()?)),
            Op::NotEquals => {
                QueryFragment::not(QueryFragment::term(name, query_value(comparison.required_value()?)))
            }
            Op::GreaterThan => QueryFragment::range(name, RangeBounds::gt(query_value(comparison.required_value()?))),
            Op::GreaterThanOrEqualTo => {
                QueryFragment::range(name, RangeBounds::gte(query_value(comparison.required_value()?)))
            }
            Op::LessThan => QueryFragment::range(name, RangeBounds::lt(query_value(comparison.required_value()?))),
            Op::LessThanOrEqualTo => {
                QueryFragment::range(name, RangeBounds::lte(query_value(comparison.required_value()?)))
            }
            Op::Between => {
                let (low, high) = comparison.required_bounds()?;
                QueryFragment::range(name, RangeBounds::between(query_value(low), query_value(high)))
            }
            Op::Exists => QueryFragment::exists(name),
            Op::Missing => QueryFragment::not(QueryFragment::exists(name)),
            Op::Contains => QueryFragment::regexp(name, contains_pattern(comparison.required_string()?)),
            Op::NotContains => {
                QueryFragment::not(QueryFragment::regexp(name, contains_pattern(comparison.required_string()?)))
            }
            Op::StartsWith => QueryFragment::prefix(name, fold_to_ascii(comparison.required_string()?)),
            Op::EndsWith => {
                QueryFragment::regexp(name, format!(".*{}", fold_to_ascii(comparison.required_string()?)))
            }
            Op::MatchesRegex => QueryFragment::regexp(name, fold_to_ascii(comparison.required_string()?)),
            Op::In => QueryFragment::terms(name, query_values(comparison.required_values()?)),
            Op::NotIn => QueryFragment::not(QueryFragment::terms(name, query_values(comparison.required_values()?))),
            Op::All => QueryFragment::must(
                query_values(comparison.required_values()?)
                    .into_iter()
                    .map(|value| QueryFragment::term(name, value))
                    .collect(),
            ),
            Op::InContains => QueryFragment::must(
                comparison
                    .required_values()?
                    .iter()
                    .map(|value| QueryFragment::regexp(name, contains_pattern(&value.to_value().to_display_string())))
                    .collect(),
            ),
            Op::HasSomeOf => QueryFragment::should(
                query_values(comparison.required_values()?)
                    .into_iter()
                    .map(|value| QueryFragment::term(name, value))
                    .collect(),
            ),
            Op::HasNoneOf => QueryFragment::must_not(
                query_values(comparison.required_values()?)
                    .into_iter()
                    .map(|value| QueryFragment::term(name, value))
                    .collect(),
            ),
            Op::IsDay | Op::IsNotDay => {
                let value = comparison.required_value()?;
                let timezone = scope.options().timezone;
                let window = property_value_date(value, Utc::now(), &timezone)
                    .and_then(|day| day_window(&day, &timezone))
                    .ok_or_else(|| {
                        RuntimeError::illegal_argument(format!(
                            "invalid {} date value '{}' for condition using operator: {} and property: {}",
                            value.family(),
                            value.to_value().to_display_string(),
                            comparison.operator,
                            name
                        ))
                    })?;
                let day = QueryFragment::range(
                    name,
                    RangeBounds {
                        gte: Some(Value::String(format_iso(&window.0))),
                        lt: Some(Value::String(format_iso(&window.1))),
                        ..RangeBounds::default()
                    },
                );
                if comparison.operator == Op::IsDay {
                    day
                } else {
                    QueryFragment::not(day)
                }
            }
            Op::Distance => {
                let distance = DistanceParameters::from_condition(condition)?;
                QueryFragment::GeoDistance {
                    field: name.to_string(),
                    center: distance.center,
                    meters: distance.meters,
                    distance_type: distance.distance_type,
                }
            }
        };
        Ok(fragment)
    }
}

/// Query form of a comparison value: strings folded, dates in ISO-8601,
/// date expressions passed through for the backend to resolve
fn query_value(value: &PropertyValue) -> Value {
    match value {
        PropertyValue::Str(s) => Value::String(fold_to_ascii(s)),
        PropertyValue::Int(i) => Value::Integer(*i),
        PropertyValue::Dbl(d) => Value::Number(*d),
        PropertyValue::Date(d) => Value::String(format_iso(d)),
        PropertyValue::DateExpr(expr) => Value::String(expr.clone()),
    }
}

fn query_values(values: &[PropertyValue]) -> Vec<Value> {
    values.iter().map(query_value).collect()
}

fn contains_pattern(value: &str) -> String {
    format!(".*{}.*", fold_to_ascii(value))
}
