//! Error types for the encounter build pipeline.

use thiserror::Error;

/// Result type alias using [`EncounterError`].
pub type Result<T> = std::result::Result<T, EncounterError>;

/// Top-level error type for all encounter build errors.
///
/// None of these abort a whole encounter build. The [`RuleEngine`](crate::rules::RuleEngine)
/// logs a failed step and moves on to the next one.
#[derive(Debug, Error)]
pub enum EncounterError {
    /// Failed to read a settings or contract file.
    #[error("Failed to read file '{path}': {source}")]
    Io {
        /// Path to the file.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a JSON document.
    #[error("Failed to parse JSON '{path}': {source}")]
    JsonParse {
        /// Path (or label) of the document that failed to parse.
        path: String,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Failed to parse a RON document.
    #[error("Failed to parse RON '{path}': {source}")]
    RonParse {
        /// Path (or label) of the document that failed to parse.
        path: String,
        /// Underlying parse error.
        #[source]
        source: ron::error::SpannedError,
    },

    /// Settings file has an extension we cannot load.
    #[error("Unsupported settings format '{0}' (expected .json or .ron)")]
    UnsupportedFormat(String),

    /// A blackboard key was published twice in one run.
    #[error("Logic state key '{0}' was already set this run")]
    StateKeyAlreadySet(&'static str),

    /// A guid could not be resolved against the scene registry.
    #[error("Scene object not found: {0}")]
    UnresolvedReference(String),

    /// A team has no lance that could be used as a copy template.
    #[error("Team '{0}' has no lances available to copy")]
    MissingTemplateLance(String),

    /// The external unit-generation service failed.
    #[error("Unit generation failed for lance '{lance}' slot {index}: {message}")]
    UnitGeneration {
        /// Lance being autofilled.
        lance: String,
        /// Zero-based unit slot.
        index: usize,
        /// Error message from the generator.
        message: String,
    },
}
