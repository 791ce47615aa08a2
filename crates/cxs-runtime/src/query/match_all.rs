use super::{BuildScope, ConditionQueryBuilder, QueryFragment};
use crate::context::Context;
use crate::error::Result;
use cxs_core::Condition;

#[derive(Debug, Default)]
pub struct MatchAllConditionQueryBuilder;

impl ConditionQueryBuilder for MatchAllConditionQueryBuilder {
    fn build_query(&self, _condition: &Condition, _context: &Context, _scope: &BuildScope<'_>) -> Result<QueryFragment> {
        Ok(QueryFragment::MatchAll)
    }
}
