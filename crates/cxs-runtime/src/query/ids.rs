use super::{BuildScope, ConditionQueryBuilder, QueryFragment};
use crate::context::Context;
use crate::error::{Result, RuntimeError};
use cxs_core::Condition;

/// `ids` query, negated when `match` is false
#[derive(Debug, Default)]
pub struct IdsConditionQueryBuilder;

impl ConditionQueryBuilder for IdsConditionQueryBuilder {
    fn build_query(&self, condition: &Condition, _context: &Context, _scope: &BuildScope<'_>) -> Result<QueryFragment> {
        let ids = condition
            .parameter("ids")
            .and_then(|v| v.as_array())
            .ok_or_else(|| RuntimeError::illegal_argument("idsCondition requires an ids list"))?;
        let values = ids.iter().map(|id| id.to_display_string()).collect();
        let query = QueryFragment::Ids { values };

        if condition.parameter("match").and_then(|v| v.as_bool()).unwrap_or(true) {
            Ok(query)
        } else {
            Ok(QueryFragment::not(query))
        }
    }
}
