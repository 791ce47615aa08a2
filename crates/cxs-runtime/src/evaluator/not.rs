use super::{ConditionEvaluator, EvalScope};
use crate::context::Context;
use crate::error::{Result, RuntimeError};
use cxs_core::{Condition, Item};

/// Negates `subCondition`
#[derive(Debug, Default)]
pub struct NotConditionEvaluator;

impl ConditionEvaluator for NotConditionEvaluator {
    fn eval(&self, condition: &Condition, item: &Item, context: &Context, scope: &EvalScope<'_>) -> Result<bool> {
        let sub_condition = condition
            .sub_condition("subCondition")?
            .ok_or_else(|| RuntimeError::illegal_argument("notCondition requires a subCondition"))?;
        Ok(!scope.eval(sub_condition, item, context)?)
    }
}
