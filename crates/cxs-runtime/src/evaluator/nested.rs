use super::{ConditionEvaluator, EvalScope};
use crate::context::Context;
use crate::error::{Result, RuntimeError};
use cxs_core::{Condition, Item, Value};
use std::collections::HashMap;

/// Evaluates `subCondition` against each object of the list found at `path`.
///
/// Every object is evaluated on its own, as if it were the only element of
/// the list: for `properties.interests` the sub-condition sees an item whose
/// `properties.interests` is that object. The condition matches when any
/// object does.
#[derive(Debug, Default)]
pub struct NestedConditionEvaluator;

impl ConditionEvaluator for NestedConditionEvaluator {
    fn eval(&self, condition: &Condition, item: &Item, context: &Context, scope: &EvalScope<'_>) -> Result<bool> {
        let path = condition.string_parameter("path");
        let sub_condition = condition.sub_condition("subCondition")?;
        let (Some(path), Some(sub_condition)) = (path, sub_condition) else {
            return Err(RuntimeError::illegal_argument(
                "nestedCondition requires a path and a subCondition",
            ));
        };

        let Some(Value::Array(elements)) = item.get(path) else {
            return Ok(false);
        };

        for element in elements.iter().filter(|e| matches!(e, Value::Object(_))) {
            let nested_item = Item {
                item_type: item.item_type.clone(),
                item_id: item.item_id.clone(),
                fields: flatten_nested_item(path, element),
            };
            match scope.eval(sub_condition, &nested_item, context) {
                Ok(true) => return Ok(true),
                Ok(false) => {}
                Err(e) => {
                    tracing::error!(path, error = %e, "Failed to evaluate nested sub-condition");
                    return Ok(false);
                }
            }
        }
        Ok(false)
    }
}

/// Fields of an item holding `element` at `path`. Paths of fewer than two
/// segments, or with empty segments, give no fields.
fn flatten_nested_item(path: &str, element: &Value) -> HashMap<String, Value> {
    let segments: Vec<&str> = path.split('.').collect();
    let mut fields = HashMap::new();
    if segments.len() < 2 || segments.iter().any(|s| s.is_empty()) {
        return fields;
    }

    let mut nested = element.clone();
    for segment in segments[1..].iter().rev() {
        let mut level = HashMap::new();
        level.insert(segment.to_string(), nested);
        nested = Value::Object(level);
    }
    fields.insert(segments[0].to_string(), nested);
    fields
}
