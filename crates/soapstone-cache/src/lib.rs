//! soapstone-cache — Bounded memoization for repeated notes.
//!
//! A strict-LRU store keyed by text fingerprint, with single-flight
//! coordination so concurrent requests for the same note collapse into
//! one computation while requests for different notes never block each
//! other.

pub mod memo;

pub use memo::{CacheOutcome, CacheStats, MemoCache};
