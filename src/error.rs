//! Error types for specification comparison

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which of the two compared documents an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentSide {
    /// The legacy ("old") document
    Old,
    /// The replacement ("new") document
    New,
}

impl std::fmt::Display for DocumentSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentSide::Old => write!(f, "old"),
            DocumentSide::New => write!(f, "new"),
        }
    }
}

/// Errors that can occur while comparing two specification documents
#[derive(Error, Debug)]
pub enum SpecError {
    /// The top-level input is not a document-shaped value
    #[error("Malformed {side} document: {reason}")]
    MalformedInput { side: DocumentSide, reason: String },

    /// Text could not be decoded as JSON or YAML
    #[error("Failed to parse {side} document: {message}")]
    Parse { side: DocumentSide, message: String },

    /// Invalid mapping configuration
    #[error("Invalid mapping configuration: {0}")]
    Config(String),

    /// Unrecognized report format name
    #[error("Unknown report format: {0}")]
    UnknownFormat(String),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SpecError {
    /// Shorthand for a malformed-input error on the given side
    pub fn malformed(side: DocumentSide, reason: impl Into<String>) -> Self {
        SpecError::MalformedInput {
            side,
            reason: reason.into(),
        }
    }

    /// The side this error refers to, if any
    pub fn side(&self) -> Option<DocumentSide> {
        match self {
            SpecError::MalformedInput { side, .. } | SpecError::Parse { side, .. } => Some(*side),
            _ => None,
        }
    }
}

/// Result type for specification comparison
pub type SpecResult<T> = Result<T, SpecError>;
