//! Timing of recognition passes
//!
//! Durations come from `chrono`, which reads `Date.now()` under wasm.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

/// Count and total duration of one named operation
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Timing {
    count: usize,
    total_ms: f64,
}

/// Running totals of how long named operations took
#[derive(Debug, Default)]
pub struct PerformanceMonitor {
    measurements: HashMap<String, Timing>,
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_measurement(&mut self, operation: &str, duration_ms: f64) {
        let timing = self.measurements.entry(operation.to_string()).or_default();
        timing.count += 1;
        timing.total_ms += duration_ms;
    }

    /// Record the time elapsed since `started`
    pub fn record_since(&mut self, operation: &str, started: DateTime<Utc>) -> f64 {
        let elapsed = (Utc::now() - started).num_microseconds().unwrap_or(i64::MAX) as f64 / 1000.0;
        self.record_measurement(operation, elapsed);
        elapsed
    }

    pub fn get_average_time(&self, operation: &str) -> Option<f64> {
        self.measurements
            .get(operation)
            .filter(|timing| timing.count > 0)
            .map(|timing| timing.total_ms / timing.count as f64)
    }

    pub fn count(&self, operation: &str) -> usize {
        self.measurements.get(operation).map_or(0, |timing| timing.count)
    }
}
