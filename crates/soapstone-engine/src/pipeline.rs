//! The classification pipeline: split, label, compose.
//!
//! A pipeline owns one segmenter and one classifier over a shared
//! lexicon. `run` is pure with respect to its input text, which is
//! what lets the service layer memoize results by fingerprint.

use std::sync::Arc;

use tracing::debug;

use soapstone_config::SplitterConfig;
use soapstone_core::{ClassifiedNote, ConfigError};
use soapstone_lexicon::{clinical_default, LexiconStore};

use crate::classify::Classifier;
use crate::compose::compose;
use crate::segment::Segmenter;

pub struct SoapPipeline {
    segmenter: Segmenter,
    classifier: Classifier,
    lexicon: Arc<LexiconStore>,
}

impl SoapPipeline {
    pub fn new(lexicon: Arc<LexiconStore>, segmenter: Segmenter) -> Self {
        Self {
            segmenter,
            classifier: Classifier::new(Arc::clone(&lexicon)),
            lexicon,
        }
    }

    /// Embedded clinical lexicon and the stock abbreviation list.
    pub fn with_defaults() -> Result<Self, ConfigError> {
        let lexicon = Arc::new(LexiconStore::load(clinical_default())?);
        let segmenter = Segmenter::new(SplitterConfig::default().abbreviations);
        Ok(Self::new(lexicon, segmenter))
    }

    /// Classify one note. Deterministic: equal text in, equal note out.
    pub fn run(&self, text: &str) -> ClassifiedNote {
        self.run_with(text, &self.segmenter)
    }

    /// Classify with a caller-supplied segmenter, for per-call
    /// abbreviation overrides.
    pub fn run_with(&self, text: &str, segmenter: &Segmenter) -> ClassifiedNote {
        let sentences = segmenter.split_all(text);
        if sentences.is_empty() {
            debug!("no sentences in input, returning empty note");
            return ClassifiedNote::default();
        }
        compose(self.classifier.classify_all(sentences))
    }

    pub fn lexicon(&self) -> &LexiconStore {
        &self.lexicon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_is_deterministic() {
        let pipeline = SoapPipeline::with_defaults().unwrap();
        let text = "Patient reports headache. BP 120/80. Continue ibuprofen 200mg.";
        assert_eq!(pipeline.run(text), pipeline.run(text));
    }

    #[test]
    fn test_empty_text_yields_empty_note() {
        let pipeline = SoapPipeline::with_defaults().unwrap();
        assert!(pipeline.run("").is_empty());
        assert!(pipeline.run("   \n ").is_empty());
    }

    #[test]
    fn test_every_sentence_is_accounted_for() {
        let pipeline = SoapPipeline::with_defaults().unwrap();
        let note = pipeline.run("Reports dizziness. Totally unrelated words here. Start meclizine.");
        assert_eq!(note.sentence_count(), 3);
    }

    #[test]
    fn test_run_with_override_segmenter() {
        let pipeline = SoapPipeline::with_defaults().unwrap();
        let text = "Take melatonin q.h.s. Recheck sleep in a month.";
        assert_eq!(pipeline.run(text).sentence_count(), 2);

        // Guarding the dosing shorthand keeps the whole line together.
        let custom = Segmenter::new(["q.h.s.".to_string()]);
        let note = pipeline.run_with(text, &custom);
        assert_eq!(note.sentence_count(), 1);
        assert_eq!(note.plan.len(), 1);
    }
}
