//! Text normalization shared by the tokenizer, the lexicon, and the
//! cache fingerprint. Lexicon phrases and note tokens must pass through
//! the same rules or lookups silently miss.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Normalize a single raw token: lowercase, strip surrounding
/// punctuation. Interior clinical markers survive because only the ends
/// are trimmed ("120/80." -> "120/80", "98.6," -> "98.6"), and a
/// trailing percent sign is kept ("98%" stays "98%").
///
/// Returns an empty string for pure-punctuation input; callers skip
/// empty tokens.
pub fn normalize_token(raw: &str) -> String {
    raw.to_lowercase()
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .trim_end_matches(|c: char| !(c.is_alphanumeric() || c == '%'))
        .to_string()
}

/// Whitespace-and-case normalization of a whole note, the input to the
/// cache fingerprint. Collapses all whitespace runs to single spaces.
pub fn normalize_text(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split a lexicon phrase into its normalized token sequence.
pub fn tokenize_phrase(phrase: &str) -> Vec<String> {
    phrase
        .split_whitespace()
        .map(normalize_token)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Stable identity of a note's normalized text, used as the cache key.
/// Two notes differing only in case or whitespace share a fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of_text(text: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(normalize_text(text).as_bytes());
        Fingerprint(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
