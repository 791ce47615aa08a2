//! Query builder dispatcher

use super::{ConditionQueryBuilder, HitCounter, QueryFragment};
use crate::context::{Context, ParameterResolver};
use crate::dispatch::{record_call, resolve_condition_type, DispatchOptions};
use crate::error::{Result, RuntimeError};
use crate::observability::MetricsCollector;
use crate::registry::{ConditionTypeRegistry, HandlerRegistry};
use cxs_core::{Condition, ConditionType};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;

/// Compiles condition trees into backend queries
pub struct ConditionQueryBuilderDispatcher {
    types: Arc<dyn ConditionTypeRegistry>,
    builders: Arc<HandlerRegistry<dyn ConditionQueryBuilder>>,
    resolver: ParameterResolver,
    hit_counter: Option<Arc<dyn HitCounter>>,
    metrics: Option<Arc<MetricsCollector>>,
    options: DispatchOptions,
}

impl ConditionQueryBuilderDispatcher {
    pub fn new(
        types: Arc<dyn ConditionTypeRegistry>,
        builders: Arc<HandlerRegistry<dyn ConditionQueryBuilder>>,
        resolver: ParameterResolver,
    ) -> Self {
        Self {
            types,
            builders,
            resolver,
            hit_counter: None,
            metrics: None,
            options: DispatchOptions::default(),
        }
    }

    pub fn with_hit_counter(mut self, hit_counter: Arc<dyn HitCounter>) -> Self {
        self.hit_counter = Some(hit_counter);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn with_options(mut self, options: DispatchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &DispatchOptions {
        &self.options
    }

    pub fn build_filter(&self, condition: &Condition) -> Result<QueryFragment> {
        self.build_filter_with_context(condition, &Context::new())
    }

    /// Compile a condition tree into a filter.
    ///
    /// An unregistered builder key or unresolvable contextual parameters
    /// degrade the node to [`QueryFragment::MatchAll`] so the surrounding
    /// query still runs. A condition type with neither a query builder nor
    /// a parent condition is an error.
    pub fn build_filter_with_context(&self, condition: &Condition, context: &Context) -> Result<QueryFragment> {
        self.build_at(condition, context, 0)
    }

    /// The full search request body for a condition, for logging and debugging
    pub fn get_query(&self, condition: &Condition) -> Result<serde_json::Value> {
        let filter = self.build_filter(condition)?;
        Ok(json!({
            "query": {
                "bool": {
                    "must": [QueryFragment::MatchAll.to_json()],
                    "filter": [filter.to_json()],
                }
            }
        }))
    }

    pub fn count(&self, condition: &Condition) -> Result<u64> {
        self.count_with_context(condition, &Context::new())
    }

    /// Count the stored items matching a condition. Unlike
    /// [`build_filter`](Self::build_filter) nothing degrades: an unresolvable
    /// condition or a missing builder is an error.
    pub fn count_with_context(&self, condition: &Condition, context: &Context) -> Result<u64> {
        self.count_at(condition, context, 0)
    }

    /// Run a built query through the configured hit counter
    pub fn count_hits(&self, query: &QueryFragment) -> Result<u64> {
        match &self.hit_counter {
            Some(counter) => counter.count_hits(query),
            None => Err(RuntimeError::UnsupportedOperation(
                "no hit counter configured, queries cannot be counted".to_string(),
            )),
        }
    }

    fn condition_type(&self, condition: &Condition, depth: usize) -> Result<Arc<ConditionType>> {
        self.options.check_depth(depth)?;
        resolve_condition_type(self.types.as_ref(), condition).ok_or_else(|| {
            RuntimeError::illegal_argument(format!(
                "condition type '{}' not found",
                condition.condition_type_id
            ))
        })
    }

    fn build_at(&self, condition: &Condition, context: &Context, depth: usize) -> Result<QueryFragment> {
        let condition_type = self.condition_type(condition, depth)?;

        let Some(key) = condition_type.query_builder.as_deref() else {
            let parent = parent_of(&condition_type)?;
            let context = self.resolver.extend_context(&condition.parameter_values, context);
            return self.build_at(parent, &context, depth + 1);
        };

        let Some(builder) = self.builders.get(key) else {
            tracing::debug!(
                condition_type = %condition_type.id,
                query_builder = key,
                "No query builder registered, filter matches everything"
            );
            return Ok(QueryFragment::MatchAll);
        };

        let Some(contextual) = self.resolver.contextualize(condition, &condition_type, context) else {
            tracing::debug!(
                condition_type = %condition_type.id,
                "Unresolvable contextual parameters, filter matches everything"
            );
            return Ok(QueryFragment::MatchAll);
        };

        let scope = BuildScope {
            dispatcher: self,
            depth,
        };
        let start = Instant::now();
        let result = builder.build_query(&contextual, context, &scope);
        record_call(self.metrics.as_deref(), "query_builder", key, start.elapsed(), result.is_err());

        if let Err(e) = &result {
            tracing::error!(
                condition_type = %condition_type.id,
                query_builder = key,
                error = %e,
                "Query building failed"
            );
        }
        result
    }

    fn count_at(&self, condition: &Condition, context: &Context, depth: usize) -> Result<u64> {
        let condition_type = self.condition_type(condition, depth)?;

        let Some(key) = condition_type.query_builder.as_deref() else {
            let parent = parent_of(&condition_type)?;
            let context = self.resolver.extend_context(&condition.parameter_values, context);
            return self.count_at(parent, &context, depth + 1);
        };

        let builder = self.builders.get(key).ok_or_else(|| {
            RuntimeError::UnsupportedOperation(format!(
                "no query builder registered for key '{}' of condition type '{}'",
                key, condition_type.id
            ))
        })?;

        let contextual = self
            .resolver
            .contextualize(condition, &condition_type, context)
            .ok_or_else(|| {
                RuntimeError::UnresolvedCondition(format!(
                    "contextual parameters of condition type '{}' cannot be resolved",
                    condition_type.id
                ))
            })?;

        let scope = BuildScope {
            dispatcher: self,
            depth,
        };
        let start = Instant::now();
        let result = builder.count(&contextual, context, &scope);
        record_call(self.metrics.as_deref(), "count", key, start.elapsed(), result.is_err());

        if let Err(e) = &result {
            tracing::error!(
                condition_type = %condition_type.id,
                query_builder = key,
                error = %e,
                "Count failed"
            );
        }
        result
    }
}

/// Parent condition of a type without a query builder
fn parent_of(condition_type: &ConditionType) -> Result<&Condition> {
    condition_type.parent_condition.as_ref().ok_or_else(|| {
        RuntimeError::UnsupportedOperation(format!(
            "condition type '{}' has neither a query builder nor a parent condition",
            condition_type.id
        ))
    })
}

/// Handle given to query builders for recursing into sub-conditions
pub struct BuildScope<'a> {
    dispatcher: &'a ConditionQueryBuilderDispatcher,
    depth: usize,
}

impl BuildScope<'_> {
    /// Build the filter of a sub-condition one level down the tree
    pub fn build_filter(&self, condition: &Condition, context: &Context) -> Result<QueryFragment> {
        self.dispatcher.build_at(condition, context, self.depth + 1)
    }

    /// Count a sub-condition one level down the tree
    pub fn count(&self, condition: &Condition, context: &Context) -> Result<u64> {
        self.dispatcher.count_at(condition, context, self.depth + 1)
    }

    pub fn count_hits(&self, query: &QueryFragment) -> Result<u64> {
        self.dispatcher.count_hits(query)
    }

    pub fn options(&self) -> &DispatchOptions {
        &self.dispatcher.options
    }
}
