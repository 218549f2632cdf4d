//! Assembly of classified sentences into the five-bucket note.

use soapstone_core::{ClassifiedNote, ClassifiedSentence};

/// Route each sentence to its section bucket, preserving note order
/// within every bucket. Every input sentence lands in exactly one
/// bucket, so the composed note always accounts for the whole input.
pub fn compose(classified: Vec<ClassifiedSentence>) -> ClassifiedNote {
    let mut note = ClassifiedNote::default();
    for sentence in classified {
        note.section_mut(sentence.label).push(sentence);
    }
    note
}

#[cfg(test)]
mod tests {
    use super::*;
    use soapstone_core::{LabelOrigin, SectionLabel, Sentence};

    fn classified(index: usize, text: &str, label: SectionLabel) -> ClassifiedSentence {
        ClassifiedSentence {
            sentence: Sentence {
                index,
                text: text.to_string(),
                start: 0,
                end: text.len(),
                tokens: Vec::new(),
            },
            label,
            origin: LabelOrigin::Cue,
            entities: Vec::new(),
            cue_matches: Vec::new(),
        }
    }

    #[test]
    fn test_every_sentence_lands_in_one_bucket() {
        let note = compose(vec![
            classified(0, "reports pain", SectionLabel::Subjective),
            classified(1, "bp stable", SectionLabel::Objective),
            classified(2, "gibberish", SectionLabel::Unclassified),
        ]);
        assert_eq!(note.sentence_count(), 3);
        assert_eq!(note.subjective.len(), 1);
        assert_eq!(note.objective.len(), 1);
        assert_eq!(note.unclassified.len(), 1);
    }

    #[test]
    fn test_note_order_survives_within_a_bucket() {
        let note = compose(vec![
            classified(0, "first", SectionLabel::Plan),
            classified(1, "interleaved", SectionLabel::Subjective),
            classified(2, "second", SectionLabel::Plan),
        ]);
        let indices: Vec<usize> = note.plan.iter().map(|s| s.sentence.index).collect();
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn test_empty_input_composes_empty_note() {
        let note = compose(Vec::new());
        assert!(note.is_empty());
        assert_eq!(note, ClassifiedNote::default());
    }
}
