use thiserror::Error;

/// Configuration problems detected while building a pipeline.
///
/// These are fatal at startup and never raised on the query path: a
/// constructed pipeline has already passed every check in this enum.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Two lexicon entries share a normalized phrase but disagree on the
    /// section label. Caught at load time, not per query.
    #[error("ambiguous lexicon: phrase '{phrase}' maps to both {first} and {second}")]
    AmbiguousLexicon {
        phrase: String,
        first: String,
        second: String,
    },

    #[error("cache capacity must be at least 1")]
    ZeroCacheCapacity,

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {reason}")]
    Parse { path: String, reason: String },
}

/// Problems with the text handed to the pipeline.
///
/// Recovered locally: `process` maps these to a well-defined empty result
/// instead of failing the call.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("input text is empty after normalization")]
    Empty,
}

/// Instrumentation failures during offline evaluation.
///
/// Swallowed and logged by the caller; never affects the returned result.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("reference note has no populated sections")]
    EmptyReference,

    #[error("evaluation record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SoapstoneError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("input error: {0}")]
    Input(#[from] InputError),

    #[error("metrics error: {0}")]
    Metrics(#[from] MetricsError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, SoapstoneError>;
