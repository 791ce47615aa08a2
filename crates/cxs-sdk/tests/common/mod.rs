//! Common test utilities for SDK integration tests

#![allow(dead_code)]

use cxs_sdk::{Condition, ConditionEngine, ConditionEngineBuilder, HitCounter, QueryFragment, Value};
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Hit counter that counts the queries it receives
#[derive(Default)]
pub struct CallCounter {
    pub calls: AtomicU64,
}

impl HitCounter for CallCounter {
    fn count_hits(&self, _query: &QueryFragment) -> cxs_runtime::Result<u64> {
        Ok(self.calls.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

/// Engine with the built-in plugin and a [`CallCounter`]
pub fn engine() -> (ConditionEngine, Arc<CallCounter>) {
    let counter = Arc::new(CallCounter::default());
    let engine = ConditionEngineBuilder::new()
        .with_hit_counter(counter.clone())
        .build()
        .expect("engine builds");
    (engine, counter)
}

/// Write content to a temporary file with the given extension
pub fn temp_file(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

pub fn profile_property(name: &str, operator: &str, parameter: &str, value: impl Into<Value>) -> Condition {
    Condition::new("profilePropertyCondition")
        .with_parameter("propertyName", name)
        .with_parameter("comparisonOperator", operator)
        .with_parameter(parameter, value)
}
