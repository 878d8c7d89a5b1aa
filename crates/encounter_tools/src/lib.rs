//! # Encounter Tools
//!
//! Command-line tools for development:
//! - Offline encounter builds against JSON contracts and scenes
//! - Settings validation

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod build;
pub mod validate;

use encounter_core::error::EncounterError;
use thiserror::Error;

/// Errors reported by the tools.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Loading or building failed.
    #[error(transparent)]
    Encounter(#[from] EncounterError),

    /// `--date` was not `YYYY-MM-DD`.
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Report could not be serialized.
    #[error("failed to write report: {0}")]
    Report(#[from] serde_json::Error),
}

/// Result type for tool operations.
pub type Result<T> = std::result::Result<T, ToolError>;
