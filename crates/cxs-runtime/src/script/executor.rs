//! Script executor with a process-wide compilation cache

use super::interpreter::evaluate;
use crate::context::Context;
use crate::error::{Result, RuntimeError};
use cxs_core::Value;
use cxs_parser::{Expression, ExpressionParser};
use dashmap::DashMap;
use std::sync::Arc;

/// Compiles and runs `script::` expressions.
///
/// Parsed expressions are cached by source text and never evicted: scripts
/// come from authored condition definitions, so the set of distinct sources
/// is closed. Two threads racing on the first use of a script may both
/// parse it; the results are identical.
#[derive(Debug, Default)]
pub struct ScriptExecutor {
    cache: DashMap<String, Arc<Expression>>,
}

impl ScriptExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a script against the context
    pub fn execute(&self, script: &str, context: &Context) -> Result<Value> {
        let expression = self.compile(script)?;
        evaluate(&expression, context).map_err(|e| RuntimeError::Script {
            expression: script.to_string(),
            message: e.to_string(),
        })
    }

    /// Parsed form of a script, from the cache when already seen
    pub fn compile(&self, script: &str) -> Result<Arc<Expression>> {
        if let Some(expression) = self.cache.get(script) {
            return Ok(expression.clone());
        }

        let expression = Arc::new(ExpressionParser::parse(script).map_err(|e| RuntimeError::Script {
            expression: script.to_string(),
            message: e.to_string(),
        })?);
        tracing::debug!(script, "Compiled script expression");
        self.cache.insert(script.to_string(), expression.clone());
        Ok(expression)
    }

    /// Number of cached expressions
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
