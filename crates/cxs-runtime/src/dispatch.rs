//! Options and helpers shared by the evaluator and query builder dispatchers

use crate::error::{Result, RuntimeError};
use crate::observability::{Metrics, MetricsCollector};
use crate::registry::ConditionTypeRegistry;
use chrono::{FixedOffset, Offset, Utc};
use cxs_core::{Condition, ConditionType};
use std::sync::Arc;
use std::time::Duration;

/// Default bound on condition tree depth
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Per-dispatcher settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispatchOptions {
    /// Timezone of day windows and date math rounding
    pub timezone: FixedOffset,
    /// Deepest condition nesting accepted, counting parent delegation.
    /// `None` disables the check.
    pub max_depth: Option<usize>,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            timezone: Utc.fix(),
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }
}

impl DispatchOptions {
    pub fn with_timezone(mut self, timezone: FixedOffset) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub(crate) fn check_depth(&self, depth: usize) -> Result<()> {
        match self.max_depth {
            Some(max) if depth > max => Err(RuntimeError::MaxDepthExceeded { depth }),
            _ => Ok(()),
        }
    }
}

/// Condition type attached to the condition, or looked up by its id
pub(crate) fn resolve_condition_type(
    types: &dyn ConditionTypeRegistry,
    condition: &Condition,
) -> Option<Arc<ConditionType>> {
    condition
        .condition_type
        .clone()
        .or_else(|| types.lookup(&condition.condition_type_id))
}

/// Record one handler call on an optional collector
pub(crate) fn record_call(
    metrics: Option<&MetricsCollector>,
    kind: &str,
    key: &str,
    elapsed: Duration,
    failed: bool,
) {
    if let Some(metrics) = metrics {
        let name = format!("{}_{}", kind, key);
        metrics.counter(&format!("{}_calls", name)).inc();
        metrics.record_execution_time(&name, elapsed);
        if failed {
            metrics.record_error(&name);
        }
    }
}
