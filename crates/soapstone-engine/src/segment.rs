//! Sentence splitting and tokenization.
//!
//! Boundaries fall on sentence-terminal punctuation followed by
//! whitespace-and-capital or a newline. An abbreviation guard keeps
//! "Dr. Smith" and dosing shorthand like "b.i.d." in one piece, and
//! interior periods with no following whitespace ("1.5") never split.
//! Tokens carry the shared normalization, so "120/80." and "(BP)"
//! come out as "120/80" and "bp" with their original byte spans.

use std::collections::HashSet;

use soapstone_core::normalize::normalize_token;
use soapstone_core::{Sentence, Token};

/// Splits raw note text into sentences of normalized tokens. Stateless
/// between calls; safe to share across threads.
pub struct Segmenter {
    abbreviations: HashSet<String>,
}

impl Segmenter {
    /// Build a segmenter with the given abbreviation guard list.
    /// Entries are compared lowercase, trailing period included.
    pub fn new<I>(abbreviations: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            abbreviations: abbreviations
                .into_iter()
                .map(|a| a.to_lowercase())
                .collect(),
        }
    }

    /// Lazy sentence sequence over `text`. Every call restarts from the
    /// beginning of the text. Empty input yields an empty sequence.
    pub fn split<'a>(&'a self, text: &'a str) -> SentenceIter<'a> {
        SentenceIter {
            segmenter: self,
            text,
            pos: 0,
            index: 0,
        }
    }

    pub fn split_all(&self, text: &str) -> Vec<Sentence> {
        self.split(text).collect()
    }

    fn is_guarded_abbreviation(&self, word: &str) -> bool {
        self.abbreviations.contains(&word.to_lowercase())
    }
}

/// Iterator state for one pass over a note.
pub struct SentenceIter<'a> {
    segmenter: &'a Segmenter,
    text: &'a str,
    pos: usize,
    index: usize,
}

impl<'a> Iterator for SentenceIter<'a> {
    type Item = Sentence;

    fn next(&mut self) -> Option<Sentence> {
        let rest = &self.text[self.pos..];
        let sent_start = self.pos + (rest.len() - rest.trim_start().len());
        if sent_start >= self.text.len() {
            return None;
        }

        // Track the current word so the abbreviation guard can look at
        // the token the terminal period belongs to.
        let mut word_start = sent_start;
        let mut prev_was_ws = false;
        let mut boundary_end = None;

        for (rel, ch) in self.text[sent_start..].char_indices() {
            let abs = sent_start + rel;
            if ch.is_whitespace() {
                prev_was_ws = true;
                continue;
            }
            if prev_was_ws {
                word_start = abs;
                prev_was_ws = false;
            }
            if matches!(ch, '.' | '!' | '?') {
                let end = abs + ch.len_utf8();
                if ch == '.' && self.segmenter.is_guarded_abbreviation(&self.text[word_start..end]) {
                    continue;
                }
                if boundary_follows(&self.text[end..]) {
                    boundary_end = Some(end);
                    break;
                }
            }
        }

        let end = boundary_end.unwrap_or(self.text.len());
        let trimmed = self.text[sent_start..end].trim_end();
        let sent_end = sent_start + trimmed.len();
        self.pos = end;

        let sentence = Sentence {
            index: self.index,
            text: trimmed.to_string(),
            start: sent_start,
            end: sent_end,
            tokens: tokenize(self.text, sent_start, sent_end),
        };
        self.index += 1;
        Some(sentence)
    }
}

/// True when the text after a terminal mark starts a new sentence:
/// end of input, a newline, or whitespace followed by a capital.
fn boundary_follows(rest: &str) -> bool {
    if rest.is_empty() {
        return true;
    }
    let ws_len = rest.len() - rest.trim_start().len();
    if ws_len == 0 {
        // Interior period with no whitespace after it ("1.5", "i.e").
        return false;
    }
    if rest[..ws_len].contains('\n') {
        return true;
    }
    match rest[ws_len..].chars().next() {
        Some(ch) => ch.is_uppercase(),
        None => true,
    }
}

/// Whitespace-delimited tokens of `text[start..end]`, normalized, with
/// absolute byte spans. Pure-punctuation words are dropped.
fn tokenize(text: &str, start: usize, end: usize) -> Vec<Token> {
    let slice = &text[start..end];
    let mut tokens = Vec::new();
    let mut word_start: Option<usize> = None;

    for (rel, ch) in slice.char_indices() {
        if ch.is_whitespace() {
            if let Some(from) = word_start.take() {
                push_token(&mut tokens, slice, from, rel, start);
            }
        } else if word_start.is_none() {
            word_start = Some(rel);
        }
    }
    if let Some(from) = word_start {
        push_token(&mut tokens, slice, from, slice.len(), start);
    }

    tokens
}

fn push_token(tokens: &mut Vec<Token>, slice: &str, from: usize, to: usize, base: usize) {
    let normalized = normalize_token(&slice[from..to]);
    if normalized.is_empty() {
        return;
    }
    tokens.push(Token {
        text: normalized,
        start: base + from,
        end: base + to,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segmenter() -> Segmenter {
        Segmenter::new(
            ["dr.", "mg.", "b.i.d.", "e.g."]
                .into_iter()
                .map(String::from),
        )
    }

    #[test]
    fn test_splits_on_period_whitespace_capital() {
        let text = "Patient reports headache. BP 120/80. No acute distress noted. Continue ibuprofen 200mg twice daily.";
        let sentences = segmenter().split_all(text);
        assert_eq!(sentences.len(), 4);
        assert_eq!(sentences[0].text, "Patient reports headache.");
        assert_eq!(sentences[1].text, "BP 120/80.");
        assert_eq!(sentences[2].text, "No acute distress noted.");
        assert_eq!(sentences[3].text, "Continue ibuprofen 200mg twice daily.");
        for (i, s) in sentences.iter().enumerate() {
            assert_eq!(s.index, i);
        }
    }

    #[test]
    fn test_abbreviation_guard_blocks_false_split() {
        let sentences = segmenter().split_all("Seen by Dr. Smith today. Follow up next week.");
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].text, "Seen by Dr. Smith today.");
    }

    #[test]
    fn test_dosing_abbreviation_stays_joined() {
        let sentences = segmenter().split_all("Take amoxicillin b.i.d. With food only.");
        assert_eq!(sentences.len(), 1);
        // Without the guard, the capital after the shorthand forces a split.
        let unguarded = Segmenter::new(std::iter::empty())
            .split_all("Take amoxicillin b.i.d. With food only.");
        assert_eq!(unguarded.len(), 2);
    }

    #[test]
    fn test_decimal_numbers_never_split() {
        let sentences = segmenter().split_all("Dose raised to 1.5 tabs daily.");
        assert_eq!(sentences.len(), 1);
    }

    #[test]
    fn test_newline_is_a_boundary_without_capital() {
        let sentences = segmenter().split_all("Reports headache.\nbp 120/80 noted.");
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[1].text, "bp 120/80 noted.");
    }

    #[test]
    fn test_lowercase_continuation_stays_joined() {
        let sentences = segmenter().split_all("BP 120/80. spo2 98% on room air.");
        assert_eq!(sentences.len(), 1);
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        assert!(segmenter().split_all("").is_empty());
        assert!(segmenter().split_all("   \n\t  ").is_empty());
    }

    #[test]
    fn test_unterminated_final_sentence_is_kept() {
        let sentences = segmenter().split_all("Reports headache. Will monitor");
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[1].text, "Will monitor");
    }

    #[test]
    fn test_tokens_are_normalized_with_spans() {
        let text = "BP 120/80.";
        let sentences = segmenter().split_all(text);
        let tokens = &sentences[0].tokens;
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "bp");
        assert_eq!(&text[tokens[0].start..tokens[0].end], "BP");
        assert_eq!(tokens[1].text, "120/80");
        assert_eq!(&text[tokens[1].start..tokens[1].end], "120/80.");
    }

    #[test]
    fn test_split_is_restartable() {
        let seg = segmenter();
        let text = "Reports pain. Continue ibuprofen.";
        let first: Vec<Sentence> = seg.split(text).collect();
        let second: Vec<Sentence> = seg.split(text).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_sentence_spans_cover_source_text() {
        let text = "  Reports pain!  BP 120/80. ";
        let sentences = segmenter().split_all(text);
        assert_eq!(sentences.len(), 2);
        for s in &sentences {
            assert_eq!(&text[s.start..s.end], s.text);
        }
    }
}
