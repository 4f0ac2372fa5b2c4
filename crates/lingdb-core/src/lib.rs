//! lingdb Core - record types and comparison semantics
//!
//! This crate provides the data model every other lingdb crate builds on:
//! - Datapoint values (primitives and collections of primitives)
//! - The schema of known survey properties
//! - Immutable Language records and deduplicated LanguageSets
//! - Mode-based comparison and k-of-set matching

pub mod compare;
pub mod error;
pub mod language;
pub mod language_set;
pub mod schema;
pub mod value;

pub use compare::{
    compare, compare_primitives, compare_values, intersect_ordered, match_set, values_equal,
    Mode, SetMatch,
};
pub use error::{LingDbError, Result};
pub use language::{Language, LanguageBuilder};
pub use language_set::LanguageSet;
pub use schema::DatapointKey;
pub use value::{Context, DatapointValue, FieldKind, Primitive};
