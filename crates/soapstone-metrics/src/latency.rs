//! Wall-clock latency aggregation for pipeline calls.

use std::sync::Mutex;
use std::time::Duration;

use metrics::{counter, histogram};

use soapstone_core::CallLatency;

#[derive(Debug, Default)]
struct Aggregate {
    calls: u64,
    cache_hits: u64,
    total_micros: u64,
    min_micros: u64,
    max_micros: u64,
}

/// Thread-safe latency accumulator shared by every call into one
/// service instance.
#[derive(Debug, Default)]
pub struct LatencyRecorder {
    inner: Mutex<Aggregate>,
}

impl LatencyRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one call's latency into the aggregate and publish it on the
    /// `metrics` facade.
    pub fn observe(&self, latency: CallLatency) {
        counter!("soapstone_process_total").increment(1);
        if latency.cache_hit {
            counter!("soapstone_cache_hits_total").increment(1);
        }
        histogram!("soapstone_process_duration_us").record(latency.duration_micros as f64);

        let mut agg = self.inner.lock().unwrap();
        if agg.calls == 0 || latency.duration_micros < agg.min_micros {
            agg.min_micros = latency.duration_micros;
        }
        if latency.duration_micros > agg.max_micros {
            agg.max_micros = latency.duration_micros;
        }
        agg.calls += 1;
        agg.total_micros += latency.duration_micros;
        if latency.cache_hit {
            agg.cache_hits += 1;
        }
    }

    pub fn summary(&self) -> LatencySummary {
        let agg = self.inner.lock().unwrap();
        let mean_micros = if agg.calls > 0 {
            agg.total_micros / agg.calls
        } else {
            0
        };
        LatencySummary {
            calls: agg.calls,
            cache_hits: agg.cache_hits,
            total: Duration::from_micros(agg.total_micros),
            min: Duration::from_micros(agg.min_micros),
            max: Duration::from_micros(agg.max_micros),
            mean: Duration::from_micros(mean_micros),
        }
    }
}

/// Aggregate latency over every observed call.
#[derive(Debug, Clone, Default)]
pub struct LatencySummary {
    pub calls: u64,
    pub cache_hits: u64,
    pub total: Duration,
    pub min: Duration,
    pub max: Duration,
    pub mean: Duration,
}

impl LatencySummary {
    pub fn hit_rate(&self) -> f64 {
        if self.calls == 0 {
            return 0.0;
        }
        self.cache_hits as f64 / self.calls as f64
    }

    /// Generate a human-readable report.
    pub fn report(&self) -> String {
        let mut report = String::new();
        report.push_str("\n=== SOAP Pipeline Latency ===\n\n");
        report.push_str(&format!("Calls: {}\n", self.calls));
        report.push_str(&format!(
            "Cache hits: {} ({:.1}%)\n",
            self.cache_hits,
            self.hit_rate() * 100.0
        ));
        report.push_str(&format!("Total time: {:.2?}\n", self.total));
        report.push_str(&format!("Mean: {:.2?}\n", self.mean));
        report.push_str(&format!("Min: {:.2?}\n", self.min));
        report.push_str(&format!("Max: {:.2?}\n", self.max));
        report.push('\n');
        report
    }
}
