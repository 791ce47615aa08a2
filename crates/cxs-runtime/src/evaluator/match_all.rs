use super::{ConditionEvaluator, EvalScope};
use crate::context::Context;
use crate::error::Result;
use cxs_core::{Condition, Item};

/// Matches every item
#[derive(Debug, Default)]
pub struct MatchAllConditionEvaluator;

impl ConditionEvaluator for MatchAllConditionEvaluator {
    fn eval(&self, _condition: &Condition, _item: &Item, _context: &Context, _scope: &EvalScope<'_>) -> Result<bool> {
        Ok(true)
    }
}
