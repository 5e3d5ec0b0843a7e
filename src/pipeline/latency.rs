//! Inference latency measurement and reporting.

use std::time::Duration;

/// Aggregated latency statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyStats {
    pub count: usize,
    pub avg: Duration,
    pub min: Duration,
    pub max: Duration,
}

/// Collects per-cycle inference latencies.
#[derive(Debug, Default)]
pub struct LatencyTracker {
    measurements: Vec<Duration>,
}

impl LatencyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one measured inference latency.
    pub fn record(&mut self, latency: Duration) {
        self.measurements.push(latency);
    }

    /// Number of recorded measurements.
    pub fn count(&self) -> usize {
        self.measurements.len()
    }

    /// Aggregate statistics, or None when nothing was recorded.
    pub fn stats(&self) -> Option<LatencyStats> {
        if self.measurements.is_empty() {
            return None;
        }
        let count = self.measurements.len();
        let total: Duration = self.measurements.iter().sum();
        let min = *self.measurements.iter().min().unwrap_or(&Duration::ZERO);
        let max = *self.measurements.iter().max().unwrap_or(&Duration::ZERO);
        Some(LatencyStats {
            count,
            avg: total / count as u32,
            min,
            max,
        })
    }

    /// Print a one-line summary to stderr.
    pub fn print_summary(&self) {
        if let Some(stats) = self.stats() {
            eprintln!(
                "sightline: {} inferences, latency avg {}ms (min {}ms, max {}ms)",
                stats.count,
                stats.avg.as_millis(),
                stats.min.as_millis(),
                stats.max.as_millis()
            );
        }
    }
}
