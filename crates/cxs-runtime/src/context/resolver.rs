//! Contextual parameter resolution
//!
//! A parameter value written `parameter::NAME` is replaced by the context
//! entry `NAME`; `script::EXPR` is replaced by the value of the expression
//! evaluated against the context. Resolution walks nested objects and lists:
//!
//! - an object fails as a whole when any of its entries fails to resolve
//! - a list drops the elements that fail to resolve
//!
//! Nested conditions are left untouched, they are contextualized when the
//! dispatcher reaches them.

use super::Context;
use crate::script::ScriptExecutor;
use cxs_core::{Condition, ConditionType, Value};
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

pub const PARAMETER_PREFIX: &str = "parameter::";
pub const SCRIPT_PREFIX: &str = "script::";

/// Resolves `parameter::` and `script::` references against a context
#[derive(Debug, Clone)]
pub struct ParameterResolver {
    scripts: Arc<ScriptExecutor>,
}

impl ParameterResolver {
    pub fn new(scripts: Arc<ScriptExecutor>) -> Self {
        Self { scripts }
    }

    pub fn scripts(&self) -> &Arc<ScriptExecutor> {
        &self.scripts
    }

    /// Whether a value tree holds any contextual reference
    pub fn has_contextual_parameter(value: &Value) -> bool {
        match value {
            Value::String(s) => s.starts_with(PARAMETER_PREFIX) || s.starts_with(SCRIPT_PREFIX),
            Value::Object(map) => map.values().any(Self::has_contextual_parameter),
            Value::Array(items) => items.iter().any(Self::has_contextual_parameter),
            _ => false,
        }
    }

    /// Resolve one value. `None` means the value cannot be resolved in this
    /// context; a null value counts as unresolved.
    pub fn resolve(&self, value: &Value, context: &Context) -> Option<Value> {
        match value {
            Value::Null => None,
            Value::String(s) => {
                if let Some(name) = s.strip_prefix(PARAMETER_PREFIX) {
                    let resolved = context.get(name).filter(|v| !v.is_null()).cloned();
                    if resolved.is_none() {
                        tracing::debug!(parameter = name, "Contextual parameter not found in context");
                    }
                    resolved
                } else if let Some(script) = s.strip_prefix(SCRIPT_PREFIX) {
                    match self.scripts.execute(script, context) {
                        Ok(Value::Null) => None,
                        Ok(v) => Some(v),
                        Err(e) => {
                            tracing::warn!(error = %e, "Failed to evaluate script parameter");
                            None
                        }
                    }
                } else {
                    Some(value.clone())
                }
            }
            Value::Object(map) => self.resolve_map(map, context).map(Value::Object),
            Value::Array(items) => Some(Value::Array(
                items.iter().filter_map(|item| self.resolve(item, context)).collect(),
            )),
            other => Some(other.clone()),
        }
    }

    /// Resolve every entry of a map, all or nothing
    pub fn resolve_map(
        &self,
        values: &HashMap<String, Value>,
        context: &Context,
    ) -> Option<HashMap<String, Value>> {
        values
            .iter()
            .map(|(key, value)| self.resolve(value, context).map(|v| (key.clone(), v)))
            .collect()
    }

    /// Context handed to a parent condition: the caller's context extended
    /// with the child's parameter values. Contextual references among those
    /// values are resolved against the caller's context first, and left out
    /// when they cannot be.
    pub fn extend_context(&self, parameters: &HashMap<String, Value>, context: &Context) -> Context {
        let mut extended = context.clone();
        for (name, value) in parameters {
            if !Self::has_contextual_parameter(value) {
                extended.insert(name.clone(), value.clone());
            } else if let Some(resolved) = self.resolve(value, context) {
                extended.insert(name.clone(), resolved);
            } else {
                extended.remove(name);
            }
        }
        extended
    }

    /// Contextualized copy of a condition carrying its resolved type, or
    /// `None` when its parameters cannot be resolved. Conditions without
    /// contextual parameters are borrowed as is when already typed.
    pub fn contextualize<'c>(
        &self,
        condition: &'c Condition,
        condition_type: &Arc<ConditionType>,
        context: &Context,
    ) -> Option<Cow<'c, Condition>> {
        let dynamic = condition
            .parameter_values
            .values()
            .any(Self::has_contextual_parameter);

        if !dynamic {
            return Some(match &condition.condition_type {
                Some(_) => Cow::Borrowed(condition),
                None => Cow::Owned(condition.clone().with_type(condition_type.clone())),
            });
        }

        let values = self.resolve_map(&condition.parameter_values, context)?;
        Some(Cow::Owned(
            condition
                .with_parameter_values(values)
                .with_type(condition_type.clone()),
        ))
    }
}
