//! Error types for query construction and evaluation.

use thiserror::Error;

use crate::quorum::QuorumError;
use crate::transform::TransformError;

/// Failure of a whole query evaluation.
#[derive(Debug, Error)]
pub enum QueryError {
    /// A transformation failed on one language; no partial result is kept.
    #[error("Transformation function raised an error at step {step} ({transformation}) for '{language}'")]
    Transformation {
        step: usize,
        transformation: String,
        language: String,
        #[source]
        source: TransformError,
    },

    /// Context was requested before any transformation ran.
    #[error(
        "Cannot extract an entire LanguageSet as context at step {step}; \
         try transforming the LanguageSet first"
    )]
    ContextFromLanguages { step: usize },

    /// A filter found a result that is not a bool.
    #[error(
        "Filtering at step {step} requires bool results; '{language}' has a result of type {found}"
    )]
    NonBooleanFilter {
        step: usize,
        language: String,
        found: String,
    },

    /// Too few languages had data for a queried property.
    #[error(transparent)]
    Quorum(#[from] QuorumError),

    /// The query itself was malformed.
    #[error("Invalid query: {0}")]
    Construction(String),
}

impl QueryError {
    /// Returns true if the query was unanswerable rather than broken.
    pub fn is_quorum(&self) -> bool {
        matches!(self, QueryError::Quorum(_))
    }
}

/// Result type alias for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
