//! The Transformation hierarchy.
//!
//! Every step of a [`Query`](crate::Query) that changes per-language results is
//! a [`Transformation`]. Two specializations carry meaning to the engine:
//!
//! - [`Extractor`]: reads one field off a Language, with no analysis. A
//!   missing field is a per-language data error rather than a failure.
//! - [`Predicate`]: always produces a bool. Predicates never update the
//!   rationale, and are the expected precursor to a filter.
//!
//! Extractors and predicates implement [`Transformation`] through the
//! `impl_extractor!` and `impl_predicate!` macros below.

use std::fmt;

use lingdb_core::{Context, DatapointValue, Language, Primitive};
use thiserror::Error;

use crate::result::ResultValue;

/// Failure of one Transformation applied to one input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// The language has no value for the requested field.
    #[error("Language '{language}' has no datapoint '{field}'")]
    MissingDatapoint { language: String, field: String },

    /// The input was not the shape this transformation accepts.
    #[error("{transformation} expected {expected}, found {found}")]
    UnexpectedInput {
        transformation: String,
        expected: &'static str,
        found: String,
    },

    /// The two sides of a comparison have no common ordering.
    #[error("Cannot compare {left} with {right}")]
    IncomparableValues { left: String, right: String },

    /// A construction-time argument was rejected.
    #[error("Invalid argument for {transformation}: {reason}")]
    InvalidArgument {
        transformation: String,
        reason: String,
    },
}

impl TransformError {
    pub(crate) fn unexpected(transformation: &str, expected: &'static str, found: &str) -> Self {
        TransformError::UnexpectedInput {
            transformation: transformation.to_string(),
            expected,
            found: found.to_string(),
        }
    }

    pub(crate) fn invalid(transformation: &str, reason: impl Into<String>) -> Self {
        TransformError::InvalidArgument {
            transformation: transformation.to_string(),
            reason: reason.into(),
        }
    }
}

/// What the engine knows about a transformation beyond its call contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformKind {
    Transformation,
    Extractor,
    Predicate,
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformKind::Transformation => f.write_str("transformation"),
            TransformKind::Extractor => f.write_str("extractor"),
            TransformKind::Predicate => f.write_str("predicate"),
        }
    }
}

/// A pure mapping from one per-language result to a context value.
///
/// Implementations hold only their construction-time parameters.
pub trait Transformation: fmt::Debug + Send + Sync {
    /// The name this transformation is registered under.
    fn name(&self) -> &str;

    fn kind(&self) -> TransformKind {
        TransformKind::Transformation
    }

    /// The datapoint field an extractor reads.
    fn field(&self) -> Option<&str> {
        None
    }

    fn apply(&self, input: &ResultValue) -> Result<Context, TransformError>;
}

/// A transformation that pulls a value directly out of a Language.
pub trait Extractor: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    fn field(&self) -> &str;

    fn extract(&self, language: &Language) -> Result<DatapointValue, TransformError>;
}

/// A transformation whose output is always a bool.
pub trait Predicate: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    fn test(&self, input: &Context) -> Result<bool, TransformError>;
}

macro_rules! impl_extractor {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::transform::Transformation for $ty {
                fn name(&self) -> &str {
                    $crate::transform::Extractor::name(self)
                }

                fn kind(&self) -> $crate::transform::TransformKind {
                    $crate::transform::TransformKind::Extractor
                }

                fn field(&self) -> Option<&str> {
                    Some($crate::transform::Extractor::field(self))
                }

                fn apply(
                    &self,
                    input: &$crate::result::ResultValue,
                ) -> Result<lingdb_core::Context, $crate::transform::TransformError> {
                    match input {
                        $crate::result::ResultValue::Language(language) => self.extract(language),
                        other => Err($crate::transform::TransformError::unexpected(
                            $crate::transform::Extractor::name(self),
                            "language",
                            other.type_name(),
                        )),
                    }
                }
            }
        )*
    };
}

macro_rules! impl_predicate {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::transform::Transformation for $ty {
                fn name(&self) -> &str {
                    $crate::transform::Predicate::name(self)
                }

                fn kind(&self) -> $crate::transform::TransformKind {
                    $crate::transform::TransformKind::Predicate
                }

                fn apply(
                    &self,
                    input: &$crate::result::ResultValue,
                ) -> Result<lingdb_core::Context, $crate::transform::TransformError> {
                    let context = $crate::transform::expect_context(
                        $crate::transform::Predicate::name(self),
                        input,
                    )?;
                    self.test(context).map(lingdb_core::DatapointValue::from)
                }
            }
        )*
    };
}

mod extractors;
mod predicates;
mod transformations;


pub use extractors::{
    named_extractor, Get, HasStress, HasWordFormationFrequency, StressKind,
    WordFormationFrequencyKind, NAMED_EXTRACTORS,
};
pub use predicates::{
    Between, Bool, Comparison, ContainedIn, Contains, EqualsIgnoreCase, InRange, Not,
    SetComparison, SetRelation, SubstringContainedIn,
};
pub use transformations::{Intersection, Length};

/// Returns the context of a non-Language result.
pub(crate) fn expect_context<'a>(
    transformation: &str,
    input: &'a ResultValue,
) -> Result<&'a Context, TransformError> {
    match input {
        ResultValue::Context(context) => Ok(context),
        ResultValue::Language(_) => Err(TransformError::unexpected(
            transformation,
            "a datapoint value",
            "language",
        )),
    }
}

/// Returns the items of a collection context.
pub(crate) fn expect_collection<'a>(
    transformation: &str,
    input: &'a Context,
) -> Result<&'a [Primitive], TransformError> {
    input
        .as_collection()
        .ok_or_else(|| TransformError::unexpected(transformation, "list", input.type_name()))
}

/// Returns the single primitive of a scalar context.
pub(crate) fn expect_primitive<'a>(
    transformation: &str,
    input: &'a Context,
) -> Result<&'a Primitive, TransformError> {
    input
        .as_primitive()
        .ok_or_else(|| TransformError::unexpected(transformation, "primitive", input.type_name()))
}
