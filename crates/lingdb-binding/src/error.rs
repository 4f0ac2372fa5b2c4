//! Error types for request binding.

use lingdb_config::ConfigError;
use lingdb_core::LingDbError;
use lingdb_query::{QueryError, TransformError};
use thiserror::Error;

/// Failure to turn a request into query results.
#[derive(Debug, Error)]
pub enum BindingError {
    /// A token's key names no transformation or directive.
    #[error("token {position} was unrecognized: {key}={value}")]
    UnknownToken {
        position: usize,
        key: String,
        value: String,
    },

    /// A token named a transformation that rejected its argument.
    #[error("token {position} ({key}={value}) has an invalid value: {source}")]
    InvalidTokenValue {
        position: usize,
        key: String,
        value: String,
        #[source]
        source: TransformError,
    },

    #[error("No such dataset: {0}")]
    NoSuchDataset(String),

    #[error("Failed to load dataset: {0}")]
    FailedLoadingDataset(String),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Core(#[from] LingDbError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// How a failed request should be reported to its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseStatus {
    /// The request itself was malformed.
    BadRequest,
    /// The request was well formed but too few languages had the data.
    InsufficientData,
    InternalError,
}

impl ResponseStatus {
    /// The matching HTTP status code.
    pub fn http_code(self) -> u16 {
        match self {
            ResponseStatus::BadRequest => 400,
            ResponseStatus::InsufficientData => 422,
            ResponseStatus::InternalError => 500,
        }
    }
}

impl BindingError {
    pub fn status(&self) -> ResponseStatus {
        match self {
            BindingError::UnknownToken { .. }
            | BindingError::InvalidTokenValue { .. }
            | BindingError::NoSuchDataset(_) => ResponseStatus::BadRequest,
            BindingError::Query(err) if err.is_quorum() => ResponseStatus::InsufficientData,
            BindingError::Query(_) => ResponseStatus::BadRequest,
            BindingError::FailedLoadingDataset(_)
            | BindingError::Core(_)
            | BindingError::Config(_) => ResponseStatus::InternalError,
        }
    }
}

/// Result type alias for binding operations.
pub type Result<T> = std::result::Result<T, BindingError>;
