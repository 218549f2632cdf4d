//! Core data model for the SOAP classification pipeline.
//! These types cross every crate boundary in the workspace; everything
//! upstream of the final `SoapResult` is immutable once produced.

use serde::{Deserialize, Serialize};

use crate::normalize::Fingerprint;

// ---------------------------------------------------------------------------
// Section labels
// ---------------------------------------------------------------------------

/// The four standard clinical note divisions, plus the explicit
/// fallback bucket. `Unclassified` is a valid terminal outcome and is
/// never silently dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionLabel {
    Subjective,
    Objective,
    Assessment,
    Plan,
    Unclassified,
}

impl SectionLabel {
    /// The four real sections in canonical SOAP order.
    pub const CLASSIFIED: [SectionLabel; 4] = [
        SectionLabel::Subjective,
        SectionLabel::Objective,
        SectionLabel::Assessment,
        SectionLabel::Plan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionLabel::Subjective   => "subjective",
            SectionLabel::Objective    => "objective",
            SectionLabel::Assessment   => "assessment",
            SectionLabel::Plan         => "plan",
            SectionLabel::Unclassified => "unclassified",
        }
    }

    /// Parse a section key as found in lexicon files and references.
    /// Accepts the single-letter shorthand charts commonly use.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_lowercase().as_str() {
            "s" | "subjective"   => Some(SectionLabel::Subjective),
            "o" | "objective"    => Some(SectionLabel::Objective),
            "a" | "assessment"   => Some(SectionLabel::Assessment),
            "p" | "plan"         => Some(SectionLabel::Plan),
            "unclassified"       => Some(SectionLabel::Unclassified),
            _                    => None,
        }
    }

    pub fn is_classified(&self) -> bool {
        !matches!(self, SectionLabel::Unclassified)
    }
}

// ---------------------------------------------------------------------------
// Tokens and sentences
// ---------------------------------------------------------------------------

/// A normalized word or clinical-marker unit with its original span.
/// `start`/`end` are byte offsets into the source note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// One sentence of the source note. Immutable after tokenization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    /// 0-based position within the note.
    pub index: usize,
    /// Original text of the sentence, surrounding whitespace trimmed.
    pub text: String,
    /// Byte span of `text` in the source note.
    pub start: usize,
    pub end: usize,
    pub tokens: Vec<Token>,
}

impl Sentence {
    pub fn token_texts(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }
}

// ---------------------------------------------------------------------------
// Lexicon entries and cue matches
// ---------------------------------------------------------------------------

/// One cue phrase in the lexicon. Loaded once at startup; read-only
/// thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconEntry {
    /// Normalized token sequence of the phrase, in order.
    pub tokens: Vec<String>,
    pub label: SectionLabel,
    /// Static weight; higher wins ties between overlapping matches.
    pub priority: i32,
}

impl LexiconEntry {
    /// The space-joined normalized phrase, used as the exact-lookup key.
    pub fn phrase_key(&self) -> String {
        self.tokens.join(" ")
    }

    pub fn token_len(&self) -> usize {
        self.tokens.len()
    }
}

/// A lexicon phrase found in a sentence. Transient, produced per
/// classification call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CueMatch {
    pub phrase: String,
    pub label: SectionLabel,
    pub priority: i32,
    /// Token offset within the sentence where the phrase starts.
    pub offset: usize,
    /// Number of tokens the phrase spans.
    pub token_len: usize,
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Paired pressure reading such as "120/80".
    VitalSign,
    /// Drug name with a dose, such as "ibuprofen 200mg".
    MedicationDose,
    /// Body temperature reading.
    Temperature,
    /// Oxygen saturation percentage.
    OxygenSaturation,
    /// Pulse rate in beats per minute.
    HeartRate,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::VitalSign        => "vital_sign",
            EntityKind::MedicationDose   => "medication_dose",
            EntityKind::Temperature      => "temperature",
            EntityKind::OxygenSaturation => "oxygen_saturation",
            EntityKind::HeartRate        => "heart_rate",
        }
    }
}

/// A typed span extracted from a sentence by the pattern rules.
/// `start`/`end` are byte offsets into the source note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub text: String,
    pub start: usize,
    pub end: usize,
}

// ---------------------------------------------------------------------------
// Classification output
// ---------------------------------------------------------------------------

/// How a sentence received its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelOrigin {
    /// Dominant cue match in the sentence itself.
    Cue,
    /// Inherited from the immediately preceding sentence.
    Inherited,
    /// No cue and nothing to inherit.
    Unresolved,
}

/// One sentence with its final section assignment and extracted entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedSentence {
    pub sentence: Sentence,
    pub label: SectionLabel,
    pub origin: LabelOrigin,
    pub entities: Vec<Entity>,
    /// Every cue found in the sentence, dominant first.
    pub cue_matches: Vec<CueMatch>,
}

/// The classified content of one note: every sentence in exactly one
/// bucket, source order preserved within each bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedNote {
    pub subjective: Vec<ClassifiedSentence>,
    pub objective: Vec<ClassifiedSentence>,
    pub assessment: Vec<ClassifiedSentence>,
    pub plan: Vec<ClassifiedSentence>,
    pub unclassified: Vec<ClassifiedSentence>,
}

impl ClassifiedNote {
    pub fn section(&self, label: SectionLabel) -> &[ClassifiedSentence] {
        match label {
            SectionLabel::Subjective   => &self.subjective,
            SectionLabel::Objective    => &self.objective,
            SectionLabel::Assessment   => &self.assessment,
            SectionLabel::Plan         => &self.plan,
            SectionLabel::Unclassified => &self.unclassified,
        }
    }

    pub fn section_mut(&mut self, label: SectionLabel) -> &mut Vec<ClassifiedSentence> {
        match label {
            SectionLabel::Subjective   => &mut self.subjective,
            SectionLabel::Objective    => &mut self.objective,
            SectionLabel::Assessment   => &mut self.assessment,
            SectionLabel::Plan         => &mut self.plan,
            SectionLabel::Unclassified => &mut self.unclassified,
        }
    }

    /// Original sentence texts of one section, joined with single spaces.
    pub fn section_text(&self, label: SectionLabel) -> String {
        self.section(label)
            .iter()
            .map(|c| c.sentence.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn sentence_count(&self) -> usize {
        self.subjective.len()
            + self.objective.len()
            + self.assessment.len()
            + self.plan.len()
            + self.unclassified.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentence_count() == 0
    }

    /// Flatten the four real sections into a per-section text view,
    /// the shape references are supplied in.
    pub fn to_structured(&self) -> StructuredNote {
        StructuredNote {
            subjective: self.section_text(SectionLabel::Subjective),
            objective: self.section_text(SectionLabel::Objective),
            assessment: self.section_text(SectionLabel::Assessment),
            plan: self.section_text(SectionLabel::Plan),
        }
    }
}

/// What `process` returns. The note content and fingerprint are stable
/// for a given input and lexicon; the latency metadata describes the
/// call that produced this value, so a cache hit reports its own timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoapResult {
    pub note: ClassifiedNote,
    pub fingerprint: Fingerprint,
    pub latency: CallLatency,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallLatency {
    pub duration_micros: u64,
    pub cache_hit: bool,
}

// ---------------------------------------------------------------------------
// Reference notes (offline evaluation)
// ---------------------------------------------------------------------------

/// A hand-labeled SOAP note used as the ground truth in offline
/// evaluation. Sections may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredNote {
    #[serde(default)]
    pub subjective: String,
    #[serde(default)]
    pub objective: String,
    #[serde(default)]
    pub assessment: String,
    #[serde(default)]
    pub plan: String,
}

impl StructuredNote {
    pub fn section(&self, label: SectionLabel) -> Option<&str> {
        match label {
            SectionLabel::Subjective   => Some(&self.subjective),
            SectionLabel::Objective    => Some(&self.objective),
            SectionLabel::Assessment   => Some(&self.assessment),
            SectionLabel::Plan         => Some(&self.plan),
            SectionLabel::Unclassified => None,
        }
    }

    /// Labels of sections with any content.
    pub fn populated_sections(&self) -> Vec<SectionLabel> {
        SectionLabel::CLASSIFIED
            .into_iter()
            .filter(|label| {
                self.section(*label)
                    .is_some_and(|text| !text.trim().is_empty())
            })
            .collect()
    }
}
