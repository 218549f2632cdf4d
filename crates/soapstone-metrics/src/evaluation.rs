//! Offline accuracy evaluation against hand-labeled reference notes.
//!
//! Per populated reference section: Levenshtein distance between the
//! produced text and the reference text, scaled by the longer length to
//! [0, 1] where 0.0 is an exact match. Both sides pass through the
//! shared whitespace-and-case normalization first, so formatting
//! differences do not count as errors. Coverage is the fraction of
//! populated reference sections for which the pipeline produced any
//! content at all.

use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use serde::Serialize;
use strsim::levenshtein;
use uuid::Uuid;

use soapstone_core::normalize::normalize_text;
use soapstone_core::{ClassifiedNote, Fingerprint, MetricsError, SectionLabel, StructuredNote};

/// Accuracy of one section against its reference text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionAccuracy {
    pub label: SectionLabel,
    pub produced_chars: usize,
    pub reference_chars: usize,
    pub edit_distance: usize,
    /// `edit_distance / max(produced_chars, reference_chars)`;
    /// 0.0 when both sides are empty.
    pub normalized_distance: f64,
}

/// One evaluation run, shaped for structured audit storage.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationRecord {
    pub id: Uuid,
    pub fingerprint: String,
    pub sections: Vec<SectionAccuracy>,
    pub mean_normalized_distance: f64,
    pub section_coverage: f64,
    pub evaluated_at: DateTime<Utc>,
}

impl EvaluationRecord {
    pub fn to_json(&self) -> Result<String, MetricsError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Compare a produced note against a reference.
///
/// Only reference sections with content participate: comparing against
/// an intentionally empty reference section would reward or punish
/// nothing. A reference with no populated sections is an error the
/// caller logs and drops.
pub fn evaluate(
    produced: &ClassifiedNote,
    reference: &StructuredNote,
    fingerprint: &Fingerprint,
) -> Result<EvaluationRecord, MetricsError> {
    let populated = reference.populated_sections();
    if populated.is_empty() {
        return Err(MetricsError::EmptyReference);
    }

    let mut sections = Vec::with_capacity(populated.len());
    let mut covered = 0usize;

    for label in &populated {
        let produced_text = normalize_text(&produced.section_text(*label));
        let reference_text = match reference.section(*label) {
            Some(text) => normalize_text(text),
            None => continue,
        };

        if !produced_text.is_empty() {
            covered += 1;
        }

        let distance = levenshtein(&produced_text, &reference_text);
        let longest = produced_text.chars().count().max(reference_text.chars().count());
        let normalized = if longest == 0 {
            0.0
        } else {
            distance as f64 / longest as f64
        };

        sections.push(SectionAccuracy {
            label: *label,
            produced_chars: produced_text.chars().count(),
            reference_chars: reference_text.chars().count(),
            edit_distance: distance,
            normalized_distance: normalized,
        });
    }

    let mean = sections
        .iter()
        .map(|s| s.normalized_distance)
        .sum::<f64>()
        / sections.len() as f64;
    let coverage = covered as f64 / populated.len() as f64;

    counter!("soapstone_eval_total").increment(1);
    histogram!("soapstone_eval_normalized_distance").record(mean);
    histogram!("soapstone_eval_section_coverage").record(coverage);

    Ok(EvaluationRecord {
        id: Uuid::new_v4(),
        fingerprint: fingerprint.as_str().to_string(),
        sections,
        mean_normalized_distance: mean,
        section_coverage: coverage,
        evaluated_at: Utc::now(),
    })
}
