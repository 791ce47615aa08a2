//! Evaluator dispatcher

use super::ConditionEvaluator;
use crate::context::{Context, ParameterResolver};
use crate::dispatch::{record_call, resolve_condition_type, DispatchOptions};
use crate::error::{Result, RuntimeError};
use crate::observability::MetricsCollector;
use crate::registry::{ConditionTypeRegistry, HandlerRegistry};
use cxs_core::{Condition, Item};
use std::sync::Arc;
use std::time::Instant;

/// Recursively evaluates condition trees against items
pub struct ConditionEvaluatorDispatcher {
    types: Arc<dyn ConditionTypeRegistry>,
    evaluators: Arc<HandlerRegistry<dyn ConditionEvaluator>>,
    resolver: ParameterResolver,
    metrics: Option<Arc<MetricsCollector>>,
    options: DispatchOptions,
}

impl ConditionEvaluatorDispatcher {
    pub fn new(
        types: Arc<dyn ConditionTypeRegistry>,
        evaluators: Arc<HandlerRegistry<dyn ConditionEvaluator>>,
        resolver: ParameterResolver,
    ) -> Self {
        Self {
            types,
            evaluators,
            resolver,
            metrics: None,
            options: DispatchOptions::default(),
        }
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

    /// Evaluate with an empty context
    pub fn eval(&self, condition: &Condition, item: &Item) -> Result<bool> {
        self.eval_with_context(condition, item, &Context::new())
    }

    /// Evaluate a condition tree against an item.
    ///
    /// Unresolvable contextual parameters and unregistered evaluator keys
    /// make the condition a non-match. A condition type with neither an
    /// evaluator nor a parent condition is an error.
    pub fn eval_with_context(&self, condition: &Condition, item: &Item, context: &Context) -> Result<bool> {
        self.eval_at(condition, item, context, 0)
    }

    fn eval_at(&self, condition: &Condition, item: &Item, context: &Context, depth: usize) -> Result<bool> {
        self.options.check_depth(depth)?;

        let Some(condition_type) = resolve_condition_type(self.types.as_ref(), condition) else {
            tracing::debug!(
                condition_type = %condition.condition_type_id,
                "Unknown condition type, condition does not match"
            );
            return Ok(false);
        };

        let Some(key) = condition_type.condition_evaluator.as_deref() else {
            if let Some(parent) = &condition_type.parent_condition {
                let context = self.resolver.extend_context(&condition.parameter_values, context);
                return self.eval_at(parent, item, &context, depth + 1);
            }
            return Err(RuntimeError::UnsupportedOperation(format!(
                "condition type '{}' has neither an evaluator nor a parent condition",
                condition_type.id
            )));
        };

        let Some(evaluator) = self.evaluators.get(key) else {
            tracing::debug!(
                condition_type = %condition_type.id,
                evaluator = key,
                "No evaluator registered, condition does not match"
            );
            return Ok(false);
        };

        let Some(contextual) = self.resolver.contextualize(condition, &condition_type, context) else {
            tracing::debug!(
                condition_type = %condition_type.id,
                "Unresolvable contextual parameters, condition does not match"
            );
            return Ok(false);
        };

        let scope = EvalScope {
            dispatcher: self,
            depth,
        };
        let start = Instant::now();
        let result = evaluator.eval(&contextual, item, context, &scope);
        record_call(self.metrics.as_deref(), "evaluator", key, start.elapsed(), result.is_err());

        if let Err(e) = &result {
            tracing::error!(
                condition_type = %condition_type.id,
                evaluator = key,
                error = %e,
                "Condition evaluation failed"
            );
        }
        result
    }
}

/// Handle given to evaluators for recursing into sub-conditions
pub struct EvalScope<'a> {
    dispatcher: &'a ConditionEvaluatorDispatcher,
    depth: usize,
}

impl EvalScope<'_> {
    /// Evaluate a sub-condition one level down the tree
    pub fn eval(&self, condition: &Condition, item: &Item, context: &Context) -> Result<bool> {
        self.dispatcher.eval_at(condition, item, context, self.depth + 1)
    }

    pub fn options(&self) -> &DispatchOptions {
        &self.dispatcher.options
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}
