//! Dispatch metrics
//!
//! Counters and fixed-bucket duration histograms keyed by name. For every handler call the
//! dispatchers record `<kind>_<key>_calls` and `<kind>_<key>_duration`, and
//! `errors_<kind>_<key>` when the call fails. Nothing is exported anywhere;
//! callers read a [`MetricsSnapshot`].

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

/// Monotonic counter
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    pub fn inc(&self) {
        self.add(1);
    }

    pub fn add(&self, value: u64) {
        self.value.fetch_add(value, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.value.store(0, Ordering::Relaxed);
    }
}

/// Upper bounds, in seconds, of the fixed histogram buckets. Larger values
/// land in a final overflow bucket.
pub const DURATION_BUCKETS: [f64; 12] = [
    0.000_1, 0.000_25, 0.000_5, 0.001, 0.002_5, 0.005, 0.01, 0.025, 0.05, 0.1, 0.5, 1.0,
];

#[derive(Debug, Clone, Default)]
struct HistogramState {
    count: usize,
    sum: f64,
    min: f64,
    max: f64,
    buckets: [u64; DURATION_BUCKETS.len() + 1],
}

/// Distribution of observed values, in seconds for durations.
///
/// Keeps count, sum, min, max and per-bucket counts, so memory stays fixed
/// however many values are observed. Percentiles are bucket estimates.
#[derive(Debug, Default)]
pub struct Histogram {
    state: Mutex<HistogramState>,
}

impl Histogram {
    pub fn observe(&self, value: f64) {
        if value.is_nan() {
            return;
        }
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.count == 0 {
            state.min = value;
            state.max = value;
        } else {
            state.min = state.min.min(value);
            state.max = state.max.max(value);
        }
        state.count += 1;
        state.sum += value;
        let bucket = DURATION_BUCKETS
            .iter()
            .position(|bound| value <= *bound)
            .unwrap_or(DURATION_BUCKETS.len());
        state.buckets[bucket] += 1;
    }

    pub fn observe_duration(&self, duration: Duration) {
        self.observe(duration.as_secs_f64());
    }

    fn state(&self) -> HistogramState {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn count(&self) -> usize {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).count
    }

    pub fn sum(&self) -> f64 {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).sum
    }

    pub fn avg(&self) -> f64 {
        self.state().avg()
    }

    /// Per-bucket counts, the last entry being the overflow bucket
    pub fn bucket_counts(&self) -> Vec<u64> {
        self.state().buckets.to_vec()
    }

    /// Nearest-rank percentile (0-100), reported as the upper bound of the
    /// bucket holding that rank and clamped to the observed range
    pub fn percentile(&self, p: f64) -> f64 {
        self.state().percentile(p)
    }

    pub fn summary(&self) -> HistogramSummary {
        let state = self.state();
        HistogramSummary {
            count: state.count,
            sum: state.sum,
            avg: state.avg(),
            min: state.min,
            max: state.max,
            p95: state.percentile(95.0),
        }
    }

    pub fn reset(&self) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = HistogramState::default();
    }
}

impl HistogramState {
    fn avg(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }

    fn percentile(&self, p: f64) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let rank = ((p.clamp(0.0, 100.0) / 100.0) * self.count as f64).ceil().max(1.0) as u64;
        let mut seen = 0;
        for (index, hits) in self.buckets.iter().enumerate() {
            seen += hits;
            if seen >= rank {
                let bound = DURATION_BUCKETS.get(index).copied().unwrap_or(self.max);
                return bound.clamp(self.min, self.max);
            }
        }
        self.max
    }
}

/// Sink for dispatch metrics
pub trait Metrics: Send + Sync {
    fn counter(&self, name: &str) -> Arc<Counter>;

    fn histogram(&self, name: &str) -> Arc<Histogram>;

    /// Record the duration of one handler call
    fn record_execution_time(&self, operation: &str, duration: Duration) {
        self.histogram(&format!("{}_duration", operation))
            .observe_duration(duration);
    }

    /// Count one failure of the given kind
    fn record_error(&self, error_type: &str) {
        self.counter(&format!("errors_{}", error_type)).inc();
    }
}

/// Summary of one histogram
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSummary {
    pub count: usize,
    pub sum: f64,
    pub avg: f64,
    pub min: f64,
    pub max: f64,
    pub p95: f64,
}

/// Point-in-time copy of every metric
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsSnapshot {
    pub counters: BTreeMap<String, u64>,
    pub histograms: BTreeMap<String, HistogramSummary>,
}

impl MetricsSnapshot {
    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    /// Number of observations of a histogram, zero when never recorded
    pub fn observations(&self, name: &str) -> usize {
        self.histograms.get(name).map(|h| h.count).unwrap_or(0)
    }
}

/// In-memory metrics collector
#[derive(Debug, Default)]
pub struct MetricsCollector {
    counters: RwLock<HashMap<String, Arc<Counter>>>,
    histograms: RwLock<HashMap<String, Arc<Histogram>>>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let counters = self
            .counters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, counter)| (name.clone(), counter.get()))
            .collect();
        let histograms = self
            .histograms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, histogram)| (name.clone(), histogram.summary()))
            .collect();
        MetricsSnapshot { counters, histograms }
    }

    pub fn reset_all(&self) {
        for counter in self
            .counters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
        {
            counter.reset();
        }
        for histogram in self
            .histograms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
        {
            histogram.reset();
        }
    }
}

impl Metrics for MetricsCollector {
    fn counter(&self, name: &str) -> Arc<Counter> {
        if let Some(counter) = self
            .counters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return counter.clone();
        }
        self.counters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name.to_string())
            .or_default()
            .clone()
    }

    fn histogram(&self, name: &str) -> Arc<Histogram> {
        if let Some(histogram) = self
            .histograms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return histogram.clone();
        }
        self.histograms
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name.to_string())
            .or_default()
            .clone()
    }
}
