//! Service facade over the pipeline: memoization, latency accounting,
//! optional reference evaluation, best-effort audit.
//!
//! `process` is infallible for any text content. Fatal problems (bad
//! lexicon, zero cache capacity, unreadable config) surface from
//! `from_config` at startup; after that, every failure on the side of
//! the pipeline is logged and swallowed so classification always
//! returns a result.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use soapstone_cache::{CacheOutcome, CacheStats, MemoCache};
use soapstone_config::SoapConfig;
use soapstone_core::normalize::{normalize_text, Fingerprint};
use soapstone_core::{
    CallLatency, ClassifiedNote, ConfigError, InputError, SoapResult, StructuredNote,
};
use soapstone_lexicon::{LexiconStats, LexiconStore};
use soapstone_metrics::{evaluate, EvaluationRecord, LatencyRecorder, LatencySummary};

use crate::pipeline::SoapPipeline;
use crate::segment::Segmenter;

// ---------------------------------------------------------------------------
// Options and collaborators
// ---------------------------------------------------------------------------

/// Per-call knobs for [`SoapService::process`].
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Consult and populate the memoization cache. On by default.
    pub use_cache: bool,
    /// Hand-labeled reference note; when present an evaluation record
    /// is produced and handed to the audit sink.
    pub reference: Option<StructuredNote>,
    /// Replacement abbreviation list for this call only.
    pub abbreviations: Option<Vec<String>>,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            reference: None,
            abbreviations: None,
        }
    }
}

/// Downstream recording of classification results. Called best-effort
/// after each call; a failing sink is logged and never fails the call.
pub trait AuditSink: Send + Sync {
    fn record(&self, text: &str, result: &SoapResult) -> anyhow::Result<()>;

    fn record_evaluation(&self, record: &EvaluationRecord) -> anyhow::Result<()> {
        let _ = record;
        Ok(())
    }
}

/// Sink that drops everything. The default until a real store is wired.
pub struct NullAuditSink;

impl AuditSink for NullAuditSink {
    fn record(&self, _text: &str, _result: &SoapResult) -> anyhow::Result<()> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

pub struct SoapService {
    pipeline: SoapPipeline,
    cache: Option<MemoCache<ClassifiedNote>>,
    latency: LatencyRecorder,
    audit: Box<dyn AuditSink>,
    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    parallel_threshold: usize,
}

impl SoapService {
    /// Build the full service from configuration. This is the only
    /// place lexicon and capacity errors can surface.
    pub fn from_config(config: SoapConfig) -> Result<Self, ConfigError> {
        let lexicon = Arc::new(LexiconStore::load(config.lexicon_entries()?)?);
        let segmenter = Segmenter::new(config.splitter.abbreviations);
        let pipeline = SoapPipeline::new(lexicon, segmenter);

        let cache = if config.cache.enabled {
            Some(MemoCache::new(config.cache.capacity)?)
        } else {
            None
        };

        Ok(Self {
            pipeline,
            cache,
            latency: LatencyRecorder::new(),
            audit: Box::new(NullAuditSink),
            parallel_threshold: config.batch.parallel_threshold,
        })
    }

    pub fn with_defaults() -> Result<Self, ConfigError> {
        Self::from_config(SoapConfig::default())
    }

    /// Replace the audit sink. Builder-style, for wiring a real store.
    pub fn with_audit_sink(mut self, sink: Box<dyn AuditSink>) -> Self {
        self.audit = sink;
        self
    }

    /// Classify one note. Never fails: empty input becomes an empty
    /// result, metrics and audit problems are logged and dropped.
    pub fn process(&self, text: &str, options: &ProcessOptions) -> SoapResult {
        let start = Instant::now();
        let fingerprint = Fingerprint::of_text(text);

        let override_segmenter = options
            .abbreviations
            .as_ref()
            .map(|abbrevs| Segmenter::new(abbrevs.iter().cloned()));

        let (note, cache_hit) = if normalize_text(text).is_empty() {
            debug!(reason = %InputError::Empty, "returning empty note");
            (ClassifiedNote::default(), false)
        } else if let Some(ref segmenter) = override_segmenter {
            // The fingerprint covers text content only, so a call with
            // overridden abbreviations must not touch the cache.
            (self.pipeline.run_with(text, segmenter), false)
        } else if options.use_cache {
            match self.cache {
                Some(ref cache) => {
                    let (note, outcome) =
                        cache.get_or_compute(&fingerprint, || self.pipeline.run(text));
                    (note, outcome == CacheOutcome::Hit)
                }
                None => (self.pipeline.run(text), false),
            }
        } else {
            (self.pipeline.run(text), false)
        };

        let latency = CallLatency {
            duration_micros: start.elapsed().as_micros() as u64,
            cache_hit,
        };
        self.latency.observe(latency);

        let result = SoapResult {
            note,
            fingerprint,
            latency,
        };

        if let Some(ref reference) = options.reference {
            match evaluate(&result.note, reference, &result.fingerprint) {
                Ok(record) => {
                    if let Err(err) = self.audit.record_evaluation(&record) {
                        warn!(error = %err, "audit sink rejected evaluation record");
                    }
                }
                Err(err) => warn!(error = %err, "reference evaluation failed"),
            }
        }

        if let Err(err) = self.audit.record(text, &result) {
            warn!(error = %err, "audit sink rejected result");
        }

        result
    }

    /// Classify independent notes, in parallel for batches above the
    /// configured threshold. Output order matches input order.
    pub fn process_batch(&self, texts: &[&str], options: &ProcessOptions) -> Vec<SoapResult> {
        #[cfg(feature = "parallel")]
        {
            if texts.len() > self.parallel_threshold {
                use rayon::prelude::*;
                return texts
                    .par_iter()
                    .map(|text| self.process(text, options))
                    .collect();
            }
        }
        texts
            .iter()
            .map(|text| self.process(text, options))
            .collect()
    }

    pub fn latency_summary(&self) -> LatencySummary {
        self.latency.summary()
    }

    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|cache| cache.stats())
    }

    pub fn lexicon_stats(&self) -> &LexiconStats {
        self.pipeline.lexicon().stats()
    }
}
