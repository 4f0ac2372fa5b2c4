//! lingdb - composable queries over linguistic survey data
//!
//! Load a [`LanguageSet`], chain transformations into a [`Query`], and
//! evaluate it to find out which languages have a property and why.
//!
//! # Example
//!
//! ```rust
//! use lingdb::prelude::*;
//!
//! let languages = LanguageSet::from_json_str(r#"[
//!     {"name": "English", "student": "A", "netid": "a1", "consonants": ["p", "t", "k", "b"]},
//!     {"name": "French", "student": "B", "netid": "b1", "consonants": ["k", "b", "l"]}
//! ]"#).unwrap();
//!
//! let result = Query::new()
//!     .apply(Get::new("consonants"))
//!     .apply(Intersection::new(["p", "t", "k"]))
//!     .extract_context()
//!     .apply(Comparison::at_least(2i64))
//!     .filter()
//!     .evaluate(&languages)
//!     .unwrap();
//!
//! assert_eq!(result.language_set().names(), vec!["English"]);
//! ```

// Data model
pub use lingdb_core::{
    compare, match_set, values_equal, Context, DatapointKey, DatapointValue, Language,
    LanguageBuilder, LanguageSet, LingDbError, Mode, Primitive, SetMatch,
};

// Query engine
pub use lingdb_query::transform;
pub use lingdb_query::{
    Cause, Matches, PropertyQuery, Query, QueryDirective, QueryError, QueryResult, QuorumError,
    QuorumPolicy, ResultRow, Transformation,
};

// Configuration
pub use lingdb_config::{ConfigError, LingDbConfig, QueryConfig};

// Request binding
pub use lingdb_binding::{
    BindingError, DatasetCatalog, QueryResponse, Registry, RequestHandler, ResponseStatus,
    TokenValue,
};

/// Colored console logging.
#[cfg(feature = "console")]
pub use lingdb_console as console;

pub mod prelude {
    pub use super::transform::{
        Bool, Comparison, ContainedIn, Contains, Get, Intersection, Length, Not,
    };
    pub use super::{
        DatapointValue, Language, LanguageSet, Mode, Primitive, PropertyQuery, Query,
        QueryResult, QuorumPolicy,
    };
}
