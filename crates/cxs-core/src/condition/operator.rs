//! Comparison operators of the property condition

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operator of a property comparison (`comparisonOperator` parameter)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComparisonOperator {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanOrEqualTo,
    LessThan,
    LessThanOrEqualTo,
    /// Inclusive range, first value is the lower bound
    Between,
    Exists,
    Missing,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    MatchesRegex,
    In,
    NotIn,
    /// Every expected value must be present
    All,
    InContains,
    HasSomeOf,
    HasNoneOf,
    IsDay,
    IsNotDay,
    Distance,
}

impl ComparisonOperator {
    pub const ALL_OPERATORS: [ComparisonOperator; 23] = [
        ComparisonOperator::Equals,
        ComparisonOperator::NotEquals,
        ComparisonOperator::GreaterThan,
        ComparisonOperator::GreaterThanOrEqualTo,
        ComparisonOperator::LessThan,
        ComparisonOperator::LessThanOrEqualTo,
        ComparisonOperator::Between,
        ComparisonOperator::Exists,
        ComparisonOperator::Missing,
        ComparisonOperator::Contains,
        ComparisonOperator::NotContains,
        ComparisonOperator::StartsWith,
        ComparisonOperator::EndsWith,
        ComparisonOperator::MatchesRegex,
        ComparisonOperator::In,
        ComparisonOperator::NotIn,
        ComparisonOperator::All,
        ComparisonOperator::InContains,
        ComparisonOperator::HasSomeOf,
        ComparisonOperator::HasNoneOf,
        ComparisonOperator::IsDay,
        ComparisonOperator::IsNotDay,
        ComparisonOperator::Distance,
    ];

    /// Wire name of the operator
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOperator::Equals => "equals",
            ComparisonOperator::NotEquals => "notEquals",
            ComparisonOperator::GreaterThan => "greaterThan",
            ComparisonOperator::GreaterThanOrEqualTo => "greaterThanOrEqualTo",
            ComparisonOperator::LessThan => "lessThan",
            ComparisonOperator::LessThanOrEqualTo => "lessThanOrEqualTo",
            ComparisonOperator::Between => "between",
            ComparisonOperator::Exists => "exists",
            ComparisonOperator::Missing => "missing",
            ComparisonOperator::Contains => "contains",
            ComparisonOperator::NotContains => "notContains",
            ComparisonOperator::StartsWith => "startsWith",
            ComparisonOperator::EndsWith => "endsWith",
            ComparisonOperator::MatchesRegex => "matchesRegex",
            ComparisonOperator::In => "in",
            ComparisonOperator::NotIn => "notIn",
            ComparisonOperator::All => "all",
            ComparisonOperator::InContains => "inContains",
            ComparisonOperator::HasSomeOf => "hasSomeOf",
            ComparisonOperator::HasNoneOf => "hasNoneOf",
            ComparisonOperator::IsDay => "isDay",
            ComparisonOperator::IsNotDay => "isNotDay",
            ComparisonOperator::Distance => "distance",
        }
    }

    /// Ordering comparisons against a single value
    pub fn is_range(&self) -> bool {
        matches!(
            self,
            ComparisonOperator::GreaterThan
                | ComparisonOperator::GreaterThanOrEqualTo
                | ComparisonOperator::LessThan
                | ComparisonOperator::LessThanOrEqualTo
        )
    }

    /// String pattern operators, which only accept the string value family
    pub fn is_string_pattern(&self) -> bool {
        matches!(
            self,
            ComparisonOperator::Contains
                | ComparisonOperator::NotContains
                | ComparisonOperator::StartsWith
                | ComparisonOperator::EndsWith
                | ComparisonOperator::MatchesRegex
        )
    }

    /// Operators working on the plural value families
    pub fn is_multi_value(&self) -> bool {
        matches!(
            self,
            ComparisonOperator::In
                | ComparisonOperator::NotIn
                | ComparisonOperator::All
                | ComparisonOperator::InContains
                | ComparisonOperator::HasSomeOf
                | ComparisonOperator::HasNoneOf
        )
    }
}

impl FromStr for ComparisonOperator {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL_OPERATORS
            .iter()
            .find(|op| op.as_str() == s)
            .copied()
            .ok_or_else(|| CoreError::UnknownOperator(s.to_string()))
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
