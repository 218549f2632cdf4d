//! Shared fixtures for Soapstone tests.
//!
//! Hand-labeled notes, small controlled lexicons, and builders the
//! crate-level test suites reuse. Everything here is deterministic so
//! test failures reproduce exactly.

use serde::{Deserialize, Serialize};

use soapstone_core::{LexiconEntry, SectionLabel, StructuredNote};
use soapstone_lexicon::LexiconStore;

/// The canonical four-sentence note: one sentence per SOAP section,
/// with a vital-sign reading and a medication dose to extract.
pub const SAMPLE_NOTE: &str = "Patient reports headache. BP 120/80. No acute distress noted. Continue ibuprofen 200mg twice daily.";

/// Hand-labeled reference matching [`SAMPLE_NOTE`].
pub fn sample_reference() -> StructuredNote {
    StructuredNote {
        subjective: "Patient reports headache.".to_string(),
        objective: "BP 120/80.".to_string(),
        assessment: "No acute distress noted.".to_string(),
        plan: "Continue ibuprofen 200mg twice daily.".to_string(),
    }
}

/// Shorthand lexicon entry builder.
pub fn entry(phrase: &str, label: SectionLabel, priority: i32) -> LexiconEntry {
    LexiconEntry {
        tokens: phrase.split_whitespace().map(str::to_lowercase).collect(),
        label,
        priority,
    }
}

/// Minimal lexicon that classifies [`SAMPLE_NOTE`] one sentence per
/// section: reports, bp, no acute distress, continue.
pub fn scenario_lexicon() -> Vec<LexiconEntry> {
    vec![
        entry("reports", SectionLabel::Subjective, 4),
        entry("bp", SectionLabel::Objective, 6),
        entry("no acute distress", SectionLabel::Assessment, 6),
        entry("continue", SectionLabel::Plan, 6),
    ]
}

/// [`scenario_lexicon`] as a loaded store.
pub fn scenario_store() -> LexiconStore {
    LexiconStore::load(scenario_lexicon()).expect("scenario lexicon is unambiguous")
}

/// `n` notes with pairwise-distinct fingerprints, for cache tests.
pub fn distinct_notes(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| format!("Patient reports symptom number {i}. Continue observation."))
        .collect()
}

/// A note paired with its hand-labeled reference, the unit of the
/// evaluation corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledNote {
    pub text: String,
    pub reference: StructuredNote,
}

/// Small labeled corpus for accuracy evaluation tests.
pub fn labeled_corpus() -> Vec<LabeledNote> {
    vec![
        LabeledNote {
            text: SAMPLE_NOTE.to_string(),
            reference: sample_reference(),
        },
        LabeledNote {
            text: "Patient states chest tightness since morning. Vitals stable, HR 72. Likely musculoskeletal. Start naproxen 250mg.".to_string(),
            reference: StructuredNote {
                subjective: "Patient states chest tightness since morning.".to_string(),
                objective: "Vitals stable, HR 72.".to_string(),
                assessment: "Likely musculoskeletal.".to_string(),
                plan: "Start naproxen 250mg.".to_string(),
            },
        },
        LabeledNote {
            text: "Denies fever or chills. Temp 98.6 F. Follow up in two weeks.".to_string(),
            reference: StructuredNote {
                subjective: "Denies fever or chills.".to_string(),
                objective: "Temp 98.6 F.".to_string(),
                assessment: String::new(),
                plan: "Follow up in two weeks.".to_string(),
            },
        },
    ]
}

/// Parse a [`LabeledNote`] array from JSON, for corpus files kept
/// alongside tests.
pub fn load_corpus_json(json: &str) -> anyhow::Result<Vec<LabeledNote>> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sample_reference_covers_all_sections() {
        let reference = sample_reference();
        assert_eq!(reference.populated_sections().len(), 4);
    }

    #[test]
    fn test_distinct_notes_are_distinct() {
        let notes = distinct_notes(16);
        let unique: std::collections::HashSet<&String> = notes.iter().collect();
        assert_eq!(unique.len(), 16);
    }

    #[test]
    fn test_corpus_round_trips_through_json() {
        let corpus = labeled_corpus();
        let json = serde_json::to_string(&corpus).unwrap();
        let parsed = load_corpus_json(&json).unwrap();
        assert_eq!(parsed.len(), corpus.len());
        assert_eq!(parsed[0].text, corpus[0].text);
    }
}
