//! Configuration loading for Soapstone.
//! Reads soapstone.toml from the current directory or the path in the
//! SOAPSTONE_CONFIG env var. Every field has a default, so a missing
//! file at the default location yields a fully usable configuration.
//!
//! Env overrides after file load:
//! - SOAPSTONE_CACHE_CAPACITY: cache entry bound
//! - SOAPSTONE_LEXICON: path to a JSON lexicon file, switches the
//!   lexicon source to that file

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use soapstone_core::normalize::tokenize_phrase;
use soapstone_core::{ConfigError, LexiconEntry, SectionLabel};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SoapConfig {
    #[serde(default)]
    pub lexicon: LexiconConfig,
    #[serde(default)]
    pub splitter: SplitterConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconConfig {
    /// "embedded" for the built-in clinical cue set, "file" to load
    /// `path` as a JSON entry list.
    #[serde(default = "default_lexicon_source")]
    pub source: String,
    pub path: Option<String>,
}

fn default_lexicon_source() -> String { "embedded".to_string() }

impl Default for LexiconConfig {
    fn default() -> Self {
        Self {
            source: default_lexicon_source(),
            path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitterConfig {
    /// Abbreviations that never end a sentence, compared lowercase with
    /// their trailing period. Any fixed list is incomplete; deployments
    /// extend it here or per call.
    #[serde(default = "default_abbreviations")]
    pub abbreviations: Vec<String>,
}

fn default_abbreviations() -> Vec<String> {
    [
        "dr.", "mr.", "mrs.", "ms.", "st.", "vs.", "approx.", "e.g.", "i.e.",
        "mg.", "ml.", "mcg.", "tab.", "cap.", "pt.", "hx.", "dx.", "rx.", "tx.",
        "q.d.", "b.i.d.", "t.i.d.", "q.i.d.", "p.r.n.",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            abbreviations: default_abbreviations(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "bool_true")]
    pub enabled: bool,
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
}

fn bool_true() -> bool { true }
fn default_cache_capacity() -> usize { 256 }

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: bool_true(),
            capacity: default_cache_capacity(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Batches larger than this are processed in parallel when the
    /// `parallel` feature is enabled.
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

fn default_parallel_threshold() -> usize { 10 }

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: default_parallel_threshold(),
        }
    }
}

/// One entry of a JSON lexicon file:
/// `{"phrase": "no acute distress", "section": "assessment", "priority": 6}`.
/// The `section` key accepts the single-letter shorthand too.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconFileEntry {
    pub phrase: String,
    pub section: String,
    #[serde(default = "default_priority")]
    pub priority: i32,
}

fn default_priority() -> i32 { 4 }

impl SoapConfig {
    /// Load configuration from soapstone.toml.
    /// Checks SOAPSTONE_CONFIG env var first, then the current
    /// directory; a missing file at the default location falls back to
    /// built-in defaults. Env overrides apply last.
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = std::env::var("SOAPSTONE_CONFIG").ok();
        let path = explicit.clone().unwrap_or_else(|| "soapstone.toml".to_string());

        let mut config = if Path::new(&path).exists() {
            Self::load_from(&path)?
        } else if explicit.is_some() {
            return Err(ConfigError::Io {
                path,
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "config file not found",
                ),
            });
        } else {
            debug!("no soapstone.toml found, using defaults");
            SoapConfig::default()
        };

        if let Ok(raw) = std::env::var("SOAPSTONE_CACHE_CAPACITY") {
            config.apply_capacity_override(&raw)?;
        }
        if let Ok(raw) = std::env::var("SOAPSTONE_LEXICON") {
            config.lexicon.source = "file".to_string();
            config.lexicon.path = Some(raw);
        }

        Ok(config)
    }

    /// Load and parse a specific TOML file.
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        let config: SoapConfig = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        info!("configuration loaded from {}", path);
        Ok(config)
    }

    /// The lexicon entry list this configuration selects.
    pub fn lexicon_entries(&self) -> Result<Vec<LexiconEntry>, ConfigError> {
        match self.lexicon.source.as_str() {
            "embedded" => Ok(soapstone_lexicon::clinical_default()),
            "file" => {
                let path = self.lexicon.path.as_deref().ok_or_else(|| ConfigError::Parse {
                    path: "soapstone.toml".to_string(),
                    reason: "lexicon.source = \"file\" requires lexicon.path".to_string(),
                })?;
                load_lexicon_file(path)
            }
            other => Err(ConfigError::Parse {
                path: "soapstone.toml".to_string(),
                reason: format!("unknown lexicon source '{other}'"),
            }),
        }
    }

    fn apply_capacity_override(&mut self, raw: &str) -> Result<(), ConfigError> {
        let capacity = raw.trim().parse::<usize>().map_err(|_| ConfigError::Parse {
            path: "SOAPSTONE_CACHE_CAPACITY".to_string(),
            reason: format!("not a valid capacity: '{raw}'"),
        })?;
        self.cache.capacity = capacity;
        Ok(())
    }
}

/// Load a JSON lexicon file into entry form. Entries must target one of
/// the four SOAP sections.
pub fn load_lexicon_file(path: &str) -> Result<Vec<LexiconEntry>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_string(),
        source,
    })?;
    let raw: Vec<LexiconFileEntry> =
        serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_string(),
            reason: e.to_string(),
        })?;

    let mut entries = Vec::with_capacity(raw.len());
    for item in raw {
        let label = match SectionLabel::from_key(&item.section) {
            Some(label) if label.is_classified() => label,
            _ => {
                return Err(ConfigError::Parse {
                    path: path.to_string(),
                    reason: format!(
                        "lexicon entry '{}' must target a SOAP section, got '{}'",
                        item.phrase, item.section
                    ),
                })
            }
        };
        entries.push(LexiconEntry {
            tokens: tokenize_phrase(&item.phrase),
            label,
            priority: item.priority,
        });
    }

    info!("loaded {} lexicon entries from {}", entries.len(), path);
    Ok(entries)
}

mod tests;
