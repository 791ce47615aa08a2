use super::{ConditionEvaluator, EvalScope};
use crate::context::Context;
use crate::error::{Result, RuntimeError};
use cxs_core::{Condition, Item};

/// Matches items whose id is listed in `ids`, or is not listed when `match`
/// is false
#[derive(Debug, Default)]
pub struct IdsConditionEvaluator;

impl ConditionEvaluator for IdsConditionEvaluator {
    fn eval(&self, condition: &Condition, item: &Item, _context: &Context, _scope: &EvalScope<'_>) -> Result<bool> {
        let ids = condition
            .parameter("ids")
            .and_then(|v| v.as_array())
            .ok_or_else(|| RuntimeError::illegal_argument("idsCondition requires an ids list"))?;
        let should_match = condition.parameter("match").and_then(|v| v.as_bool()).unwrap_or(true);

        let listed = ids.iter().any(|id| id.as_str() == Some(item.item_id.as_str()));
        Ok(listed == should_match)
    }
}
