//! The name registry resolving request tokens to query steps.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use lingdb_core::{DatapointValue, Mode, Primitive};
use lingdb_query::transform::{
    Between, Bool, Comparison, ContainedIn, Contains, EqualsIgnoreCase, Get,
    HasStress, HasWordFormationFrequency, InRange, Intersection, Length, Not, SetComparison,
    SetRelation, SubstringContainedIn, NAMED_EXTRACTORS,
};
use lingdb_query::{Query, QueryDirective, TransformError, Transformation};
use tracing::debug;

use crate::error::{BindingError, Result};
use crate::tokens::{Token, TokenValue, DATASET_KEY};

/// A token value as handed to a constructor: the raw text and its coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument<'a> {
    pub raw: &'a str,
    pub value: TokenValue,
}

/// Builds a transformation from a token argument.
pub type Constructor =
    Box<dyn Fn(&Argument<'_>) -> std::result::Result<Arc<dyn Transformation>, TransformError> + Send + Sync>;

enum Entry {
    Transformation(Constructor),
    Directive(QueryDirective),
}

/// Maps token names to transformation constructors and directives.
pub struct Registry {
    entries: BTreeMap<String, Entry>,
    list_delimiter: String,
}

fn shared(transformation: impl Transformation + 'static) -> Arc<dyn Transformation> {
    Arc::new(transformation)
}

fn single(name: &str, arg: &Argument<'_>) -> std::result::Result<Primitive, TransformError> {
    arg.value.as_scalar().cloned().ok_or_else(|| TransformError::InvalidArgument {
        transformation: name.to_string(),
        reason: format!("expected a single value, got {}", arg.value),
    })
}

impl Registry {
    /// An empty registry using `;` as the list delimiter.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            list_delimiter: ";".to_string(),
        }
    }

    /// Every built-in transformation and directive.
    pub fn standard() -> Self {
        let mut registry = Self::new();

        registry.register("Get", |arg| {
            if arg.raw.is_empty() {
                return Err(TransformError::InvalidArgument {
                    transformation: "Get".to_string(),
                    reason: "a field name is required".to_string(),
                });
            }
            Ok(shared(Get::new(arg.raw)))
        });
        for &(name, key) in NAMED_EXTRACTORS {
            registry.register(name, move |_| Ok(shared(Get::key(key))));
        }
        registry.register("HasStress", |arg| HasStress::parse(arg.raw).map(shared));
        registry.register("HasWordFormationFrequency", |arg| {
            HasWordFormationFrequency::parse(arg.raw).map(shared)
        });

        registry.register("Length", |_| Ok(shared(Length)));
        registry.register("Intersection", |arg| {
            Ok(shared(Intersection::new(arg.value.elements())))
        });

        registry.register("Bool", |_| Ok(shared(Bool)));
        registry.register("Not", |_| Ok(shared(Not)));
        registry.register("Contains", |arg| {
            Ok(shared(Contains::new(single("Contains", arg)?)))
        });
        registry.register("ContainedIn", |arg| {
            Ok(shared(ContainedIn::new(arg.value.elements())))
        });
        registry.register("SubstringContainedIn", |arg| {
            let strings = arg.value.elements().iter().map(ToString::to_string).collect::<Vec<_>>();
            Ok(shared(SubstringContainedIn::new(strings)))
        });
        for mode in Mode::ALL {
            let name = comparison_name(mode);
            registry.register(name, move |arg| {
                Ok(shared(Comparison::new(mode, arg.value.clone())))
            });
        }
        registry.register("EqualsIgnoreCase", |arg| {
            Ok(shared(EqualsIgnoreCase::new(arg.raw)))
        });
        registry.register("Between", |arg| {
            Between::new(&DatapointValue::from(arg.value.clone())).map(shared)
        });
        registry.register("InRange", |arg| {
            InRange::new(&DatapointValue::from(arg.value.clone())).map(shared)
        });
        for relation in [
            SetRelation::Subset,
            SetRelation::Superset,
            SetRelation::StrictSubset,
            SetRelation::StrictSuperset,
        ] {
            registry.register(relation.name(), move |arg| {
                Ok(shared(SetComparison::new(relation, arg.value.elements())))
            });
        }

        for &(name, directive) in QueryDirective::NAMES {
            registry.register_directive(name, directive);
        }

        registry
    }

    pub fn with_list_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.list_delimiter = delimiter.into();
        self
    }

    pub fn list_delimiter(&self) -> &str {
        &self.list_delimiter
    }

    /// Registers (or replaces) a transformation constructor.
    pub fn register<F>(&mut self, name: &str, constructor: F)
    where
        F: Fn(&Argument<'_>) -> std::result::Result<Arc<dyn Transformation>, TransformError>
            + Send
            + Sync
            + 'static,
    {
        self.entries
            .insert(name.to_string(), Entry::Transformation(Box::new(constructor)));
    }

    pub fn register_directive(&mut self, name: &str, directive: QueryDirective) {
        self.entries
            .insert(name.to_string(), Entry::Directive(directive));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Builds the query described by `spec`.
    ///
    /// A `Dataset` token is accepted only in position 0 and is otherwise
    /// ignored here.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::UnknownToken`] for any unresolved token and
    /// [`BindingError::InvalidTokenValue`] if a constructor rejects its value.
    /// Nothing is built unless every token resolves.
    pub fn build_query(&self, spec: &[Token]) -> Result<Query> {
        let mut query = Query::new();
        for (position, (key, value)) in spec.iter().enumerate() {
            match self.entries.get(key) {
                Some(Entry::Directive(directive)) => {
                    query = query.directive(*directive);
                }
                Some(Entry::Transformation(constructor)) => {
                    let argument = Argument {
                        raw: value,
                        value: TokenValue::coerce(value, &self.list_delimiter),
                    };
                    let transformation =
                        constructor(&argument).map_err(|source| BindingError::InvalidTokenValue {
                            position,
                            key: key.clone(),
                            value: value.clone(),
                            source,
                        })?;
                    query = query.apply_shared(transformation);
                }
                None if position == 0 && key == DATASET_KEY => {}
                None => {
                    return Err(BindingError::UnknownToken {
                        position,
                        key: key.clone(),
                        value: value.clone(),
                    })
                }
            }
        }
        debug!(event = "query_built", steps = query.len(), query = %query);
        Ok(query)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("names", &self.entries.keys().collect::<Vec<_>>())
            .field("list_delimiter", &self.list_delimiter)
            .finish()
    }
}

fn comparison_name(mode: Mode) -> &'static str {
    match mode {
        Mode::Eq => "Eq",
        Mode::Neq => "Neq",
        Mode::Gt => "Gt",
        Mode::Geq => "Geq",
        Mode::Lt => "Lt",
        Mode::Leq => "Leq",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(pairs: &[(&str, &str)]) -> Vec<Token> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_standard_names() {
        let registry = Registry::standard();
        for name in [
            "Get",
            "GetConsonants",
            "HasTone",
            "HasStress",
            "Intersection",
            "Geq",
            "StrictSuperset",
            "ExtractContext",
            "FilterLanguages",
        ] {
            assert!(registry.contains(name), "missing {name}");
        }
        assert!(!registry.contains("Dataset"));
        assert!(!registry.contains("Query"));
        for &(name, _) in QueryDirective::NAMES {
            assert!(registry.contains(name), "missing directive {name}");
        }
    }

    #[test]
    fn test_build_query() {
        let query = Registry::standard()
            .build_query(&spec(&[
                ("Dataset", "_test"),
                ("GetConsonants", ""),
                ("Intersection", "p;t;k"),
                ("ExtractContext", ""),
                ("Geq", "2"),
                ("FilterLanguages", ""),
            ]))
            .unwrap();
        assert_eq!(
            query.to_string(),
            "Query[Get -> Intersection -> ExtractContext -> Geq -> FilterLanguageSet]"
        );
    }

    #[test]
    fn test_unknown_token() {
        let err = Registry::standard()
            .build_query(&spec(&[("Get", "name"), ("Dataset", "F22")]))
            .unwrap_err();
        match err {
            BindingError::UnknownToken {
                position,
                key,
                value,
            } => {
                assert_eq!(position, 1);
                assert_eq!(key, "Dataset");
                assert_eq!(value, "F22");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_token_value() {
        let registry = Registry::standard();
        let err = registry
            .build_query(&spec(&[("HasStress", "sometimes")]))
            .unwrap_err();
        assert!(matches!(
            err,
            BindingError::InvalidTokenValue { position: 0, .. }
        ));

        assert!(registry.build_query(&spec(&[("Between", "5;1")])).is_err());
        assert!(registry.build_query(&spec(&[("Contains", "p;t")])).is_err());
        assert!(registry.build_query(&spec(&[("Get", "")])).is_err());
    }

    #[test]
    fn test_custom_delimiter() {
        let registry = Registry::standard().with_list_delimiter(",");
        assert_eq!(registry.list_delimiter(), ",");
        let query = registry
            .build_query(&spec(&[("InRange", "1,5")]))
            .unwrap();
        assert_eq!(query.len(), 1);
    }

    #[test]
    fn test_register_custom() {
        let mut registry = Registry::new();
        registry.register("CountPhonemes", |_| Ok(shared(Get::new("num phonemes"))));
        let query = registry
            .build_query(&spec(&[("CountPhonemes", "")]))
            .unwrap();
        assert_eq!(query.to_string(), "Query[Get]");
        assert!(registry.build_query(&spec(&[("Length", "")])).is_err());
    }
}
