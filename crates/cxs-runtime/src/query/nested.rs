use super::{BuildScope, ConditionQueryBuilder, QueryFragment};
use crate::context::Context;
use crate::error::{Result, RuntimeError};
use cxs_core::Condition;

/// `nested` query over `path` with the `subCondition` filter
#[derive(Debug, Default)]
pub struct NestedConditionQueryBuilder;

impl ConditionQueryBuilder for NestedConditionQueryBuilder {
    fn build_query(&self, condition: &Condition, context: &Context, scope: &BuildScope<'_>) -> Result<QueryFragment> {
        let path = condition.string_parameter("path");
        let sub_condition = condition.sub_condition("subCondition")?;
        let (Some(path), Some(sub_condition)) = (path, sub_condition) else {
            return Err(RuntimeError::illegal_argument(
                "nestedCondition requires a path and a subCondition",
            ));
        };
        let query = scope.build_filter(sub_condition, context)?;
        Ok(QueryFragment::nested(path, query))
    }
}
