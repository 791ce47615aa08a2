use super::{BuildScope, ConditionQueryBuilder, QueryFragment};
use crate::context::Context;
use crate::error::{Result, RuntimeError};
use cxs_core::Condition;

/// `must_not` of the `subCondition` filter
#[derive(Debug, Default)]
pub struct NotConditionQueryBuilder;

impl ConditionQueryBuilder for NotConditionQueryBuilder {
    fn build_query(&self, condition: &Condition, context: &Context, scope: &BuildScope<'_>) -> Result<QueryFragment> {
        let sub_condition = condition
            .sub_condition("subCondition")?
            .ok_or_else(|| RuntimeError::illegal_argument("notCondition requires a subCondition"))?;
        Ok(QueryFragment::not(scope.build_filter(sub_condition, context)?))
    }
}
