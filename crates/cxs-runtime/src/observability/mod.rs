//! Observability module
//!
//! Dispatch metrics. Logging goes through `tracing` directly.

pub mod metrics;

pub use metrics::{
    Counter, Histogram, HistogramSummary, Metrics, MetricsCollector, MetricsSnapshot, DURATION_BUCKETS,
};
