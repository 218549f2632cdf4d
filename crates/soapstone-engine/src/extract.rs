//! Regex entity extraction over original sentence text.
//!
//! Patterns are compiled once into a static table. A pattern that
//! fails to compile is disabled on its own; the other patterns keep
//! running. Spans are reported in note-absolute byte offsets and
//! overlaps collapse to the earliest-then-longest match.

use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

use soapstone_core::{Entity, EntityKind, Sentence};

struct EntityPattern {
    kind: EntityKind,
    matcher: Option<Regex>,
}

impl EntityPattern {
    fn new(kind: EntityKind, pattern: &str) -> Self {
        let matcher = Regex::new(pattern).ok();
        if matcher.is_none() {
            warn!(kind = kind.as_str(), pattern, "entity pattern failed to compile, disabling");
        }
        Self { kind, matcher }
    }
}

fn patterns() -> &'static Vec<EntityPattern> {
    static PATTERNS: OnceLock<Vec<EntityPattern>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        vec![
            EntityPattern::new(EntityKind::VitalSign, r"\b\d{2,3}\s*/\s*\d{2,3}\b"),
            EntityPattern::new(
                EntityKind::MedicationDose,
                r"(?i)\b([a-z][a-z-]{2,})\s+(\d+(?:\.\d+)?)\s*(mg|mcg|g|ml|units?)\b",
            ),
            EntityPattern::new(
                EntityKind::Temperature,
                r"(?i)\b(?:3[5-9]|4[0-2]|9[5-9]|10[0-6])(?:\.\d)?\s*°?\s*[cf]\b",
            ),
            EntityPattern::new(
                EntityKind::OxygenSaturation,
                r"(?i)\b(?:spo2|o2\s*sat|sat)\s*:?\s*\d{2,3}\s*%",
            ),
            EntityPattern::new(
                EntityKind::HeartRate,
                r"(?i)\b(?:hr|pulse|heart\s+rate)\s*:?\s*\d{2,3}\b",
            ),
        ]
    })
}

/// Run every pattern over the sentence text. Returns non-overlapping
/// entities sorted by start offset.
pub fn extract_entities(sentence: &Sentence) -> Vec<Entity> {
    let mut entities = Vec::new();

    for pattern in patterns() {
        if let Some(ref matcher) = pattern.matcher {
            for mat in matcher.find_iter(&sentence.text) {
                entities.push(Entity {
                    kind: pattern.kind,
                    text: mat.as_str().to_string(),
                    start: sentence.start + mat.start(),
                    end: sentence.start + mat.end(),
                });
            }
        }
    }

    remove_overlapping(entities)
}

/// Keep the earliest match at each position, preferring the longer one
/// when two start together.
fn remove_overlapping(mut entities: Vec<Entity>) -> Vec<Entity> {
    entities.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then_with(|| (b.end - b.start).cmp(&(a.end - a.start)))
    });

    let mut kept: Vec<Entity> = Vec::with_capacity(entities.len());
    for entity in entities {
        if kept.last().map_or(true, |prev| entity.start >= prev.end) {
            kept.push(entity);
        }
    }
    kept
}
