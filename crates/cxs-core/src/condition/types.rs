//! Condition and condition type definitions

use crate::error::{CoreError, Result};
use crate::types::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// A node of the condition tree.
///
/// Conditions are treated as immutable templates once built: evaluation and
/// query building never mutate them, they produce contextualized copies via
/// [`Condition::with_parameter_values`] instead. A cached segment definition
/// can therefore be shared by concurrent evaluations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Condition {
    /// Key into the condition type registry
    #[serde(rename = "type")]
    pub condition_type_id: String,

    /// Named parameters of the condition, empty when omitted
    #[serde(default)]
    pub parameter_values: HashMap<String, Value>,

    /// Resolved condition type, attached by a registry lookup
    #[serde(skip)]
    pub condition_type: Option<Arc<ConditionType>>,
}

impl Condition {
    /// Create a condition referencing a condition type by id
    pub fn new(condition_type_id: impl Into<String>) -> Self {
        Self {
            condition_type_id: condition_type_id.into(),
            parameter_values: HashMap::new(),
            condition_type: None,
        }
    }

    /// Create a condition with an already resolved condition type
    pub fn of_type(condition_type: Arc<ConditionType>) -> Self {
        Self {
            condition_type_id: condition_type.id.clone(),
            parameter_values: HashMap::new(),
            condition_type: Some(condition_type),
        }
    }

    /// Attach a resolved condition type
    pub fn with_type(mut self, condition_type: Arc<ConditionType>) -> Self {
        self.condition_type = Some(condition_type);
        self
    }

    /// Add a parameter value
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameter_values.insert(name.into(), value.into());
        self
    }

    /// Set a parameter value in place (used while building a condition)
    pub fn set_parameter(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.parameter_values.insert(name.into(), value.into());
    }

    /// Copy of this condition (same id and resolved type) carrying other
    /// parameter values. Used to produce contextualized conditions.
    pub fn with_parameter_values(&self, parameter_values: HashMap<String, Value>) -> Self {
        Self {
            condition_type_id: self.condition_type_id.clone(),
            parameter_values,
            condition_type: self.condition_type.clone(),
        }
    }

    /// Get a parameter; null values are reported as absent
    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameter_values.get(name).filter(|v| !v.is_null())
    }

    /// Get a string parameter
    pub fn string_parameter(&self, name: &str) -> Option<&str> {
        self.parameter(name).and_then(|v| v.as_str())
    }

    /// Get a single nested condition parameter (e.g. `subCondition`)
    pub fn sub_condition(&self, name: &str) -> Result<Option<&Condition>> {
        match self.parameter(name) {
            None => Ok(None),
            Some(Value::Condition(c)) => Ok(Some(c)),
            Some(other) => Err(CoreError::invalid_parameter(
                name,
                format!("expected a condition, got {}", other.type_name()),
            )),
        }
    }

    /// Get a list of nested conditions (e.g. `subConditions`). An absent
    /// parameter yields an empty list.
    pub fn sub_conditions(&self, name: &str) -> Result<Vec<&Condition>> {
        match self.parameter(name) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_condition().ok_or_else(|| {
                        CoreError::invalid_parameter(
                            name,
                            format!("expected a list of conditions, found {}", item.type_name()),
                        )
                    })
                })
                .collect(),
            Some(Value::Condition(c)) => Ok(vec![c]),
            Some(other) => Err(CoreError::invalid_parameter(
                name,
                format!("expected a list of conditions, got {}", other.type_name()),
            )),
        }
    }
}

/// Static descriptor of a condition type.
///
/// A type names the evaluator and query builder handling it. A type with no
/// handler key may instead point at a parent condition: its own parameter
/// values then become substitution context for the parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionType {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_evaluator: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_builder: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_condition: Option<Condition>,
}

impl ConditionType {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            condition_evaluator: None,
            query_builder: None,
            parent_condition: None,
        }
    }

    pub fn with_evaluator(mut self, key: impl Into<String>) -> Self {
        self.condition_evaluator = Some(key.into());
        self
    }

    pub fn with_query_builder(mut self, key: impl Into<String>) -> Self {
        self.query_builder = Some(key.into());
        self
    }

    pub fn with_parent(mut self, parent: Condition) -> Self {
        self.parent_condition = Some(parent);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_serde_round_trip_shape() {
        let json = r#"{
            "type": "booleanCondition",
            "parameterValues": {
                "operator": "or",
                "subConditions": [
                    {"type": "matchAllCondition", "parameterValues": {}}
                ]
            }
        }"#;
        let condition: Condition = serde_json::from_str(json).unwrap();
        assert_eq!(condition.condition_type_id, "booleanCondition");
        assert_eq!(condition.string_parameter("operator"), Some("or"));
        assert_eq!(condition.sub_conditions("subConditions").unwrap().len(), 1);
        assert!(condition.condition_type.is_none());
    }

    #[test]
    fn test_null_parameter_is_absent() {
        let condition = Condition::new("propertyCondition").with_parameter("propertyValue", Value::Null);
        assert!(condition.parameter("propertyValue").is_none());
    }

    #[test]
    fn test_sub_conditions_rejects_non_conditions() {
        let condition = Condition::new("booleanCondition")
            .with_parameter("subConditions", vec![Value::from("oops")]);
        assert!(condition.sub_conditions("subConditions").is_err());
    }

    #[test]
    fn test_with_parameter_values_keeps_type() {
        let ct = Arc::new(ConditionType::new("matchAllCondition").with_evaluator("matchAll"));
        let condition = Condition::of_type(ct.clone()).with_parameter("a", 1);

        let mut values = HashMap::new();
        values.insert("b".to_string(), Value::Integer(2));
        let copy = condition.with_parameter_values(values);

        assert_eq!(copy.condition_type, Some(ct));
        assert!(copy.parameter("a").is_none());
        assert_eq!(copy.parameter("b"), Some(&Value::Integer(2)));
        // the template is untouched
        assert_eq!(condition.parameter("a"), Some(&Value::Integer(1)));
    }

    #[test]
    fn test_condition_type_with_parent_deserializes() {
        let json = r#"{
            "id": "eventTypeCondition",
            "parentCondition": {
                "type": "eventPropertyCondition",
                "parameterValues": {
                    "propertyName": "eventType",
                    "comparisonOperator": "equals",
                    "propertyValue": "parameter::eventTypeId"
                }
            }
        }"#;
        let ct: ConditionType = serde_json::from_str(json).unwrap();
        assert!(ct.condition_evaluator.is_none());
        assert_eq!(
            ct.parent_condition.unwrap().string_parameter("propertyValue"),
            Some("parameter::eventTypeId")
        );
    }
}
