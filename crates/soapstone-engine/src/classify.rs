//! Sentence labeling: cue resolution first, single-hop inheritance as
//! the fallback.
//!
//! A sentence with a winning cue takes that cue's label. A sentence
//! with no cue may inherit from the immediately preceding sentence,
//! but only when that neighbor was itself labeled by a cue; inherited
//! labels never chain. Plan and Assessment cues of any rank block
//! inheritance so a stale context cannot swallow a transition the
//! dominant match happened to lose.

use std::sync::Arc;

use soapstone_core::{ClassifiedSentence, CueMatch, LabelOrigin, SectionLabel, Sentence};
use soapstone_lexicon::LexiconStore;

use crate::extract::extract_entities;
use crate::resolver::CueResolver;

pub struct Classifier {
    resolver: CueResolver,
}

impl Classifier {
    pub fn new(lexicon: Arc<LexiconStore>) -> Self {
        Self {
            resolver: CueResolver::new(lexicon),
        }
    }

    /// Label one sentence given its already-classified predecessor.
    pub fn classify(
        &self,
        sentence: Sentence,
        prior: Option<&ClassifiedSentence>,
    ) -> ClassifiedSentence {
        let resolution = self.resolver.resolve(&sentence);

        let (label, origin) = if resolution.label.is_classified() {
            (resolution.label, LabelOrigin::Cue)
        } else if let Some(source) = inheritable(prior, &resolution.matches) {
            (source, LabelOrigin::Inherited)
        } else {
            (SectionLabel::Unclassified, LabelOrigin::Unresolved)
        };

        let entities = extract_entities(&sentence);

        ClassifiedSentence {
            sentence,
            label,
            origin,
            entities,
            cue_matches: resolution.matches,
        }
    }

    /// Label a whole note in order, feeding each result back in as the
    /// next sentence's predecessor.
    pub fn classify_all(&self, sentences: Vec<Sentence>) -> Vec<ClassifiedSentence> {
        let mut classified: Vec<ClassifiedSentence> = Vec::with_capacity(sentences.len());
        for sentence in sentences {
            let labeled = self.classify(sentence, classified.last());
            classified.push(labeled);
        }
        classified
    }
}

/// The label to inherit, if any. Requires a cue-labeled predecessor
/// and no forward-transition cue among the current matches.
fn inheritable(
    prior: Option<&ClassifiedSentence>,
    matches: &[CueMatch],
) -> Option<SectionLabel> {
    let prior = prior?;
    if prior.origin != LabelOrigin::Cue || !prior.label.is_classified() {
        return None;
    }
    if has_blocking_cue(matches) {
        return None;
    }
    Some(prior.label)
}

fn has_blocking_cue(matches: &[CueMatch]) -> bool {
    matches
        .iter()
        .any(|m| matches!(m.label, SectionLabel::Plan | SectionLabel::Assessment))
}
