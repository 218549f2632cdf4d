//! soapstone-core — Shared types, errors, and text normalization used across all Soapstone crates.

pub mod error;
pub mod normalize;
pub mod types;

// Re-export commonly used types
pub use error::{ConfigError, InputError, MetricsError, Result, SoapstoneError};
pub use normalize::Fingerprint;
pub use types::{
    CallLatency, ClassifiedNote, ClassifiedSentence, CueMatch, Entity, EntityKind, LabelOrigin,
    LexiconEntry, SectionLabel, Sentence, SoapResult, StructuredNote, Token,
};
