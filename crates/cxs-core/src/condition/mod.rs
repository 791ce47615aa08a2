//! Condition Module
//!
//! Conditions are the query/segmentation language of the platform. A
//! condition is a node of a recursive expression tree that carries:
//! - a condition type id, resolved lazily into a [`ConditionType`]
//! - named parameter values (scalars, lists, maps, nested conditions or
//!   contextual placeholders such as `parameter::name` and `script::expr`)
//!
//! # JSON form
//!
//! ```json
//! {
//!   "type": "booleanCondition",
//!   "parameterValues": {
//!     "operator": "and",
//!     "subConditions": [
//!       {
//!         "type": "profilePropertyCondition",
//!         "parameterValues": {
//!           "propertyName": "properties.age",
//!           "comparisonOperator": "greaterThanOrEqualTo",
//!           "propertyValueInteger": 18
//!         }
//!       }
//!     ]
//!   }
//! }
//! ```
//!
//! # Property comparisons
//!
//! The generic property comparison uses a `comparisonOperator` and values typed
//! by parameter name suffix (`propertyValue`, `propertyValueInteger`,
//! `propertyValueDouble`, `propertyValueDate`, `propertyValueDateExpr` and their
//! plural forms). [`ComparisonValues`] turns them into a tagged union.

mod operator;
mod property;
mod types;

pub use operator::ComparisonOperator;
pub use property::{
    parse_date_value, parse_iso_date, ComparisonValues, PropertyValue, MULTI_VALUE_PARAMETERS,
    SINGLE_VALUE_PARAMETERS,
};
pub use types::{Condition, ConditionType};
