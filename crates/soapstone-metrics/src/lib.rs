//! soapstone-metrics — Latency and accuracy instrumentation.
//!
//! Two concerns, both strictly on the side of the pipeline: per-call
//! latency aggregation (always on), and offline accuracy evaluation
//! against hand-labeled reference notes (only when a reference is
//! supplied). Neither can alter a classification result, and evaluation
//! failures are surfaced as [`soapstone_core::MetricsError`] for the
//! caller to log and drop.
//!
//! Counters and histograms are also published through the `metrics`
//! facade, so deployments can attach whatever exporter they run.

pub mod evaluation;
pub mod latency;

pub use evaluation::{evaluate, EvaluationRecord, SectionAccuracy};
pub use latency::{LatencyRecorder, LatencySummary};
