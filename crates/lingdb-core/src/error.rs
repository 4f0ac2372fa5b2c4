//! Error types for lingdb records.

use thiserror::Error;

/// Main error type for building and loading language records.
#[derive(Debug, Error)]
pub enum LingDbError {
    /// A record lacks one of the identity fields (name, student, netid).
    #[error("A Language must be given a non-empty {field}")]
    MissingIdentity { field: &'static str },

    /// A record could not be interpreted as a flat mapping of datapoints.
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// A comparison mode string was not recognized.
    #[error("Unrecognized comparison mode '{0}'")]
    InvalidMode(String),

    /// Two records in one LanguageSet share the same identity.
    #[error("A LanguageSet may not contain duplicate languages: {0}")]
    DuplicateLanguage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for lingdb record operations.
pub type Result<T> = std::result::Result<T, LingDbError>;
