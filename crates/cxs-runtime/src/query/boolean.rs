use super::{BuildScope, ConditionQueryBuilder, QueryFragment};
use crate::context::Context;
use crate::error::{Result, RuntimeError};
use cxs_core::Condition;

/// `and` becomes `must` clauses, `or` becomes `should` clauses with at least
/// one match required. A single sub-condition is returned unwrapped and an
/// empty list matches everything.
#[derive(Debug, Default)]
pub struct BooleanConditionQueryBuilder;

impl ConditionQueryBuilder for BooleanConditionQueryBuilder {
    fn build_query(&self, condition: &Condition, context: &Context, scope: &BuildScope<'_>) -> Result<QueryFragment> {
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

        let mut clauses = condition
            .sub_conditions("subConditions")?
            .into_iter()
            .map(|sub_condition| scope.build_filter(sub_condition, context))
            .collect::<Result<Vec<_>>>()?;

        Ok(match clauses.len() {
            0 => QueryFragment::MatchAll,
            1 => clauses.remove(0),
            _ if is_and => QueryFragment::must(clauses),
            _ => QueryFragment::should(clauses),
        })
    }
}
