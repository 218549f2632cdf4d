//! Immutable cue-phrase store: token-sequence trie + exact-phrase map.
//!
//! Every phrase passes through the shared token normalization at load
//! time, so lookups against tokenizer output never miss on case or
//! punctuation differences.

use ahash::AHashMap;
use tracing::{debug, info, warn};

use soapstone_core::normalize::{normalize_token, tokenize_phrase};
use soapstone_core::{ConfigError, LexiconEntry, SectionLabel};

/// One node of the phrase trie. Children are keyed by normalized token.
#[derive(Debug, Default)]
struct TrieNode {
    children: AHashMap<String, TrieNode>,
    /// The entry whose phrase ends at this node, if any.
    terminal: Option<LexiconEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct LexiconStats {
    pub subjective_count: usize,
    pub objective_count: usize,
    pub assessment_count: usize,
    pub plan_count: usize,
    pub total_phrases: usize,
    /// Token length of the longest phrase, the bound on any prefix scan.
    pub max_phrase_tokens: usize,
}

/// The loaded lexicon. No mutation operations exist after `load`; the
/// store is shared read-only across all concurrent pipeline calls.
#[derive(Debug)]
pub struct LexiconStore {
    root: TrieNode,
    phrases: AHashMap<String, LexiconEntry>,
    stats: LexiconStats,
}

impl LexiconStore {
    /// Build the trie and phrase map from an entry list.
    ///
    /// Fails with [`ConfigError::AmbiguousLexicon`] if two entries share
    /// a normalized phrase but target different sections. Two entries
    /// with the same phrase and the same section keep the higher
    /// priority. Entries that normalize to zero tokens are skipped.
    pub fn load(entries: Vec<LexiconEntry>) -> Result<Self, ConfigError> {
        let mut phrases: AHashMap<String, LexiconEntry> = AHashMap::new();

        for entry in entries {
            let tokens: Vec<String> = entry
                .tokens
                .iter()
                .map(|t| normalize_token(t))
                .filter(|t| !t.is_empty())
                .collect();
            if tokens.is_empty() {
                warn!("skipping lexicon entry with no usable tokens: {:?}", entry.tokens);
                continue;
            }

            let normalized = LexiconEntry {
                tokens,
                label: entry.label,
                priority: entry.priority,
            };
            let key = normalized.phrase_key();

            match phrases.get_mut(&key) {
                Some(existing) if existing.label != normalized.label => {
                    return Err(ConfigError::AmbiguousLexicon {
                        phrase: key,
                        first: existing.label.as_str().to_string(),
                        second: normalized.label.as_str().to_string(),
                    });
                }
                Some(existing) => {
                    debug!(
                        "duplicate lexicon phrase '{}', keeping priority {}",
                        key,
                        existing.priority.max(normalized.priority)
                    );
                    if normalized.priority > existing.priority {
                        existing.priority = normalized.priority;
                    }
                }
                None => {
                    phrases.insert(key, normalized);
                }
            }
        }

        let mut root = TrieNode::default();
        for entry in phrases.values() {
            let mut node = &mut root;
            for token in &entry.tokens {
                node = node.children.entry(token.clone()).or_default();
            }
            node.terminal = Some(entry.clone());
        }

        let count_label = |label: SectionLabel| {
            phrases.values().filter(|e| e.label == label).count()
        };
        let stats = LexiconStats {
            subjective_count: count_label(SectionLabel::Subjective),
            objective_count: count_label(SectionLabel::Objective),
            assessment_count: count_label(SectionLabel::Assessment),
            plan_count: count_label(SectionLabel::Plan),
            total_phrases: phrases.len(),
            max_phrase_tokens: phrases.values().map(|e| e.token_len()).max().unwrap_or(0),
        };

        info!(
            "lexicon loaded: {} subjective, {} objective, {} assessment, {} plan cues (total: {})",
            stats.subjective_count,
            stats.objective_count,
            stats.assessment_count,
            stats.plan_count,
            stats.total_phrases
        );

        Ok(Self { root, phrases, stats })
    }

    /// Every entry whose phrase starts at `offset` in the token
    /// sequence, longest match first.
    pub fn lookup_at(&self, tokens: &[&str], offset: usize) -> Vec<&LexiconEntry> {
        let mut found = Vec::new();
        let mut node = &self.root;
        for token in tokens.iter().skip(offset) {
            match node.children.get(*token) {
                Some(child) => {
                    if let Some(entry) = &child.terminal {
                        found.push(entry);
                    }
                    node = child;
                }
                None => break,
            }
        }
        found.reverse();
        found
    }

    /// Exact lookup of a full phrase, normalized the same way entries
    /// were at load time.
    pub fn lookup_exact(&self, phrase: &str) -> Option<&LexiconEntry> {
        self.phrases.get(&tokenize_phrase(phrase).join(" "))
    }

    pub fn stats(&self) -> &LexiconStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}
