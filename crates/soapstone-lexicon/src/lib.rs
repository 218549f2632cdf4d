//! soapstone-lexicon — Cue-phrase vocabulary for SOAP section classification.
//!
//! The lexicon is a token-sequence trie plus an exact-phrase hash map,
//! built once at startup and read-only afterwards. The trie answers
//! "which phrases start at this token offset" longest match first; the
//! hash map answers exact-phrase lookups in O(1) average.

pub mod defaults;
pub mod store;

pub use defaults::clinical_default;
pub use store::{LexiconStats, LexiconStore};
