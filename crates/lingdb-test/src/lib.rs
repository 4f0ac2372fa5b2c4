//! Shared test fixtures for lingdb crates.
//!
//! This crate provides sample corpora for testing.
//! It depends only on `lingdb-core` so that `lingdb-query` and
//! `lingdb-binding` can both use it as a dev-dependency.
//!
//! - [`corpus`] - the English/French/Spanish consonant corpus
//! - [`partial`] - corpora with gaps, for missing-data and quorum tests
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! lingdb-test = { workspace = true }
//! ```
//!
//! ```ignore
//! use lingdb_test::corpus::three_languages;
//! ```

pub mod corpus;
pub mod partial;

pub use corpus::{language, three_languages, three_languages_json};
pub use partial::{partial_tone, with_present};
