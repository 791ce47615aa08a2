use super::{ConditionEvaluator, EvalScope};
use crate::context::Context;
use crate::error::{Result, RuntimeError};
use cxs_core::{Condition, Item};

/// Combines `subConditions` with `operator` (`and` or `or`, `and` when
/// absent). Evaluation stops at the first deciding sub-condition. An empty
/// list matches.
#[derive(Debug, Default)]
pub struct BooleanConditionEvaluator;

impl ConditionEvaluator for BooleanConditionEvaluator {
    fn eval(&self, condition: &Condition, item: &Item, context: &Context, scope: &EvalScope<'_>) -> Result<bool> {
        let is_and = match condition.string_parameter("operator") {
            None => true,
            Some(op) if op.eq_ignore_ascii_case("and") => true,
            Some(op) if op.eq_ignore_ascii_case("or") => false,
            Some(op) => {
                return Err(RuntimeError::illegal_argument(format!(
                    "unknown boolean operator: {}",
                    op
                )))
            }
        };

        let sub_conditions = condition.sub_conditions("subConditions")?;
        if sub_conditions.is_empty() {
            return Ok(true);
        }

        for sub_condition in sub_conditions {
            let matched = scope.eval(sub_condition, item, context)?;
            if is_and && !matched {
                return Ok(false);
            }
            if !is_and && matched {
                return Ok(true);
            }
        }
        Ok(is_and)
    }
}
