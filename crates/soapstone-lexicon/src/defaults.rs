//! Embedded clinical cue set (fastest startup, no file I/O).
//!
//! A compact vocabulary of section cues as they appear in charted
//! notes: patient-voice verbs for Subjective, exam and vitals shorthand
//! for Objective, diagnostic language for Assessment, disposition verbs
//! for Plan. Deployments with their own phrase lists load them through
//! the configuration layer instead.

use soapstone_core::normalize::tokenize_phrase;
use soapstone_core::{LexiconEntry, SectionLabel};

fn entry(phrase: &str, label: SectionLabel, priority: i32) -> LexiconEntry {
    LexiconEntry {
        tokens: tokenize_phrase(phrase),
        label,
        priority,
    }
}

/// The default cue lexicon. Guaranteed unambiguous; `LexiconStore::load`
/// asserts that again at startup.
pub fn clinical_default() -> Vec<LexiconEntry> {
    let mut entries = Vec::new();

    // Section headings as written at the top of each note division.
    let headings = [
        ("subjective", SectionLabel::Subjective),
        ("objective", SectionLabel::Objective),
        ("assessment", SectionLabel::Assessment),
        ("plan", SectionLabel::Plan),
    ];
    for (phrase, label) in headings {
        entries.push(entry(phrase, label, 10));
    }

    // Patient-voice cues
    let subjective_strong = [
        "chief complaint",
        "history of present illness",
        "hpi",
        "patient reports",
        "patient states",
        "complains of",
        "c/o",
        "presents with",
        "per patient",
    ];
    for phrase in subjective_strong {
        entries.push(entry(phrase, SectionLabel::Subjective, 6));
    }
    let subjective_weak = ["reports", "states", "denies", "describes", "endorses", "feels"];
    for phrase in subjective_weak {
        entries.push(entry(phrase, SectionLabel::Subjective, 4));
    }

    // Exam and vitals shorthand
    let objective_strong = [
        "physical exam",
        "on exam",
        "exam reveals",
        "vital signs",
        "vitals",
        "blood pressure",
        "bp",
        "heart rate",
        "hr",
        "respiratory rate",
        "rr",
        "temp",
        "spo2",
        "o2 sat",
        "labs",
        "auscultation",
    ];
    for phrase in objective_strong {
        entries.push(entry(phrase, SectionLabel::Objective, 6));
    }
    let objective_weak = ["afebrile", "alert and oriented", "normotensive", "unremarkable", "wbc"];
    for phrase in objective_weak {
        entries.push(entry(phrase, SectionLabel::Objective, 4));
    }

    // Diagnostic language
    let assessment_strong = [
        "impression",
        "no acute distress",
        "differential",
        "diagnosis",
        "ddx",
        "consistent with",
        "rule out",
        "r/o",
        "likely",
        "suspect",
    ];
    for phrase in assessment_strong {
        entries.push(entry(phrase, SectionLabel::Assessment, 6));
    }
    let assessment_weak = ["probable", "improving"];
    for phrase in assessment_weak {
        entries.push(entry(phrase, SectionLabel::Assessment, 4));
    }

    // Disposition and order verbs
    let plan_strong = [
        "continue",
        "start",
        "discontinue",
        "follow up",
        "follow-up",
        "prescribe",
        "refer",
        "schedule",
        "recheck",
        "increase",
        "decrease",
        "taper",
        "admit",
        "discharge",
        "order",
        "obtain",
        "monitor",
    ];
    for phrase in plan_strong {
        entries.push(entry(phrase, SectionLabel::Plan, 6));
    }

    entries
}
