//! lingdb Binding - from request tokens to query results
//!
//! A request is an ordered list of `key=value` tokens, usually decoded from a
//! URL query string:
//!
//! ```text
//! ?Query=&Dataset=F22&Get=consonants&Intersection=p;t;k&ExtractContext=&Geq=2&FilterLanguages=
//! ```
//!
//! `Query` tokens separate queries. Each remaining key resolves through the
//! [`Registry`] to a transformation or directive, and each value is coerced
//! by [`TokenValue::coerce`]. The [`RequestHandler`] evaluates every query
//! against the [`DatasetCatalog`] and returns serializable responses.

pub mod dataset;
pub mod error;
pub mod handler;
pub mod registry;
pub mod tokens;

pub use dataset::DatasetCatalog;
pub use error::{BindingError, ResponseStatus, Result};
pub use handler::{QueryResponse, RequestHandler};
pub use registry::{Argument, Constructor, Registry};
pub use tokens::{
    parse_query_string, requested_dataset, split_query_specs, QuerySpec, Token, TokenValue,
    DATASET_KEY, QUERY_DELIMITER,
};
