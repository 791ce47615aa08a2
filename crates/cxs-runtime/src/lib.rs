//! CXS Runtime - Condition evaluation and query building
//!
//! This crate turns condition trees into decisions and queries:
//! - the evaluator dispatcher decides whether an item satisfies a condition
//! - the query builder dispatcher compiles a condition into a backend query
//! - the parameter resolver substitutes `parameter::` and `script::`
//!   references from a per-call context
//! - handler registries map condition type keys to pluggable evaluators and
//!   query builders

pub mod comparison;
pub mod context;
pub mod dates;
pub mod dispatch;
pub mod error;
pub mod evaluator;
pub mod fold;
pub mod observability;
pub mod query;
pub mod registry;
pub mod script;

// Re-export main types
pub use context::{Context, ParameterResolver, PARAMETER_PREFIX, SCRIPT_PREFIX};
pub use dispatch::{DispatchOptions, DEFAULT_MAX_DEPTH};
pub use error::{Result, RuntimeError};
pub use evaluator::{
    BooleanConditionEvaluator, ConditionEvaluator, ConditionEvaluatorDispatcher, EvalScope,
    IdsConditionEvaluator, MatchAllConditionEvaluator, NestedConditionEvaluator,
    NotConditionEvaluator, PropertyConditionEvaluator,
};
pub use fold::fold_to_ascii;
pub use observability::{Metrics, MetricsCollector, MetricsSnapshot};
pub use query::{
    BoolQuery, BooleanConditionQueryBuilder, BuildScope, ConditionQueryBuilder,
    ConditionQueryBuilderDispatcher, HitCounter, IdsConditionQueryBuilder,
    MatchAllConditionQueryBuilder, NestedConditionQueryBuilder, NotConditionQueryBuilder,
    PropertyConditionQueryBuilder, QueryFragment, RangeBounds,
};
pub use registry::{ConditionTypeRegistry, HandlerRegistry, InMemoryConditionTypeRegistry};
pub use script::ScriptExecutor;
