//! Query building
//!
//! The [`ConditionQueryBuilderDispatcher`] compiles a condition tree into a
//! backend [`QueryFragment`], handing each node to the query builder
//! registered under its condition type's query builder key.

mod boolean;
mod dispatcher;
mod fragment;
mod ids;
mod match_all;
mod nested;
mod not;
mod property;

pub use boolean::BooleanConditionQueryBuilder;
pub use dispatcher::{BuildScope, ConditionQueryBuilderDispatcher};
pub use fragment::{BoolQuery, QueryFragment, RangeBounds};
pub use ids::IdsConditionQueryBuilder;
pub use match_all::MatchAllConditionQueryBuilder;
pub use nested::NestedConditionQueryBuilder;
pub use not::NotConditionQueryBuilder;
pub use property::PropertyConditionQueryBuilder;

use crate::context::Context;
use crate::error::Result;
use cxs_core::Condition;

/// Compiles one family of conditions into query fragments.
///
/// The condition received is already contextualized.
pub trait ConditionQueryBuilder: Send + Sync {
    fn build_query(&self, condition: &Condition, context: &Context, scope: &BuildScope<'_>) -> Result<QueryFragment>;

    /// Number of stored items matching the condition. Builds the query and
    /// hands it to the dispatcher's hit counter.
    fn count(&self, condition: &Condition, context: &Context, scope: &BuildScope<'_>) -> Result<u64> {
        let query = self.build_query(condition, context, scope)?;
        scope.count_hits(&query)
    }
}

/// Runs a built query against the store and counts its hits
pub trait HitCounter: Send + Sync {
    fn count_hits(&self, query: &QueryFragment) -> Result<u64>;
}
