//! In-memory condition evaluation
//!
//! The [`ConditionEvaluatorDispatcher`] walks a condition tree against an
//! [`Item`](cxs_core::Item) and hands each node to the evaluator registered
//! under its condition type's evaluator key. Evaluators recurse into
//! sub-conditions through the [`EvalScope`] they receive.

mod boolean;
mod dispatcher;
mod ids;
mod match_all;
mod nested;
mod not;
mod property;

pub use boolean::BooleanConditionEvaluator;
pub use dispatcher::{ConditionEvaluatorDispatcher, EvalScope};
pub use ids::IdsConditionEvaluator;
pub use match_all::MatchAllConditionEvaluator;
pub use nested::NestedConditionEvaluator;
pub use not::NotConditionEvaluator;
pub use property::PropertyConditionEvaluator;

use crate::context::Context;
use crate::error::Result;
use cxs_core::{Condition, Item};

/// Decides whether an item satisfies one family of conditions.
///
/// The condition received is already contextualized: its parameters hold
/// concrete values and its condition type is attached.
pub trait ConditionEvaluator: Send + Sync {
    fn eval(&self, condition: &Condition, item: &Item, context: &Context, scope: &EvalScope<'_>) -> Result<bool>;
}
