//! soapstone-engine — The rule-based SOAP classification pipeline.
//!
//! Raw clinical free text goes in; a structured note with Subjective,
//! Objective, Assessment, and Plan sections comes out. The pipeline is
//! fully deterministic: the same text against the same lexicon always
//! produces the same result.
//!
//! Stages, in data-flow order:
//! 1. [`segment`] splits text into sentences of normalized tokens
//! 2. [`resolver`] finds every lexicon cue and picks the dominant one
//! 3. [`classify`] assigns section labels, inheriting across locally
//!    coherent sentences, and extracts typed entities
//! 4. [`compose`] folds classified sentences into the final note
//!
//! [`pipeline::SoapPipeline`] wires the stages together; callers use
//! [`service::SoapService`], which adds memoization, latency metrics,
//! and audit hooks on top.

pub mod classify;
pub mod compose;
pub mod extract;
pub mod pipeline;
pub mod resolver;
pub mod segment;
pub mod service;

pub use classify::Classifier;
pub use compose::compose;
pub use extract::extract_entities;
pub use pipeline::SoapPipeline;
pub use resolver::{CueResolver, Resolution};
pub use segment::Segmenter;
pub use service::{AuditSink, NullAuditSink, ProcessOptions, SoapService};
