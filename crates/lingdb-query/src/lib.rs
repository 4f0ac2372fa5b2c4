//! lingdb Query - composable queries over language records
//!
//! A [`Query`] is an ordered chain of [`Transformation`](transform::Transformation)s
//! and [`QueryDirective`]s. Evaluating it over a
//! [`LanguageSet`](lingdb_core::LanguageSet) produces a [`QueryResult`]: the
//! filtered languages, their current results, and any captured context.
//!
//! [`PropertyQuery`] answers single-property questions ("at least 2 of
//! p, t, k") with per-language tolerance for missing data.

pub mod directive;
pub mod error;
pub mod property;
pub mod query;
pub mod quorum;
pub mod result;
pub mod transform;

#[cfg(test)]
mod tests;

pub use directive::QueryDirective;
pub use error::{QueryError, Result};
pub use property::{Cause, Match, Matches, PropertyQuery};
pub use query::{Query, Step};
pub use quorum::{QuorumError, QuorumPolicy, DEFAULT_QUORUM_THRESHOLD};
pub use result::{ContextSet, MissingData, QueryResult, ResultRow, ResultSet, ResultValue};
pub use transform::{Extractor, Predicate, TransformError, TransformKind, Transformation};
