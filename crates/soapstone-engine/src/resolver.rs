//! Cue lookup and conflict resolution.
//!
//! Every token offset of a sentence is probed against the lexicon, and
//! all hits compete under a single dominance order: higher priority
//! wins, then the longer phrase, then the earlier offset. The ordering
//! is total over distinct matches, so resolution is deterministic for
//! a given lexicon and sentence.

use std::collections::BinaryHeap;
use std::sync::Arc;

use soapstone_core::{CueMatch, SectionLabel, Sentence};
use soapstone_lexicon::LexiconStore;

/// A cue match keyed for the resolver's max-heap. Priority descending,
/// then token length descending, then offset ascending.
#[derive(Debug, Clone)]
struct RankedMatch(CueMatch);

impl Ord for RankedMatch {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0
            .priority
            .cmp(&other.0.priority)
            .then_with(|| self.0.token_len.cmp(&other.0.token_len))
            .then_with(|| other.0.offset.cmp(&self.0.offset))
    }
}

impl PartialOrd for RankedMatch {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for RankedMatch {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for RankedMatch {}

/// Outcome of resolving one sentence: the winning label (or
/// `Unclassified` when no cue fired) plus every match in dominance
/// order, dominant first.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub label: SectionLabel,
    pub matches: Vec<CueMatch>,
}

/// Resolves sentences against a shared lexicon.
pub struct CueResolver {
    lexicon: Arc<LexiconStore>,
}

impl CueResolver {
    pub fn new(lexicon: Arc<LexiconStore>) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &LexiconStore {
        &self.lexicon
    }

    /// Collect every lexicon hit in the sentence and rank them. The
    /// dominant match decides the label; overlapping and lower-ranked
    /// matches are kept for downstream inspection.
    pub fn resolve(&self, sentence: &Sentence) -> Resolution {
        let tokens = sentence.token_texts();
        let mut heap = BinaryHeap::new();

        for offset in 0..tokens.len() {
            for entry in self.lexicon.lookup_at(&tokens, offset) {
                heap.push(RankedMatch(CueMatch {
                    phrase: entry.phrase_key(),
                    label: entry.label,
                    priority: entry.priority,
                    offset,
                    token_len: entry.token_len(),
                }));
            }
        }

        let mut matches = Vec::with_capacity(heap.len());
        while let Some(RankedMatch(m)) = heap.pop() {
            matches.push(m);
        }

        let label = matches
            .first()
            .map(|m| m.label)
            .unwrap_or(SectionLabel::Unclassified);

        Resolution { label, matches }
    }
}
