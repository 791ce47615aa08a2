//! CXS Condition Engine SDK
//!
//! High-level API for evaluating conditions against items and compiling
//! them into search queries.

pub mod builder;
pub mod builtin;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;

// Re-export main types
pub use builder::ConditionEngineBuilder;
pub use builtin::{BUILTIN_DEFINITIONS, BUILTIN_PLUGIN};
pub use config::EngineConfig;
pub use engine::{ConditionEngine, RemovedPlugin};
pub use error::{Result, SdkError};
pub use logging::init_tracing;

// Re-export commonly used types from dependencies
pub use cxs_core::{Condition, ConditionType, Item, Value};
pub use cxs_runtime::{
    ConditionEvaluator, ConditionQueryBuilder, Context, HitCounter, MetricsSnapshot, QueryFragment, RuntimeError,
};
