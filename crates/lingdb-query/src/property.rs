//! Field-level queries over a single property, with per-language tolerance
//! for missing data.

use std::fmt;

use lingdb_core::{
    compare_primitives, match_set, values_equal, DatapointValue, Language, LanguageSet, Mode,
    Primitive, SetMatch,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{QueryError, Result};
use crate::quorum::QuorumPolicy;

/// A question asked of one property of every language.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyQuery {
    /// "at least 2 of [p, t, k]".
    List {
        property: String,
        mode: Mode,
        k: usize,
        targets: Vec<Primitive>,
    },
    /// "a num consonants of more than 20".
    Num {
        property: String,
        mode: Mode,
        k: i64,
    },
    /// "a country of Nigeria"; `Eq` or `Neq` only.
    Text {
        property: String,
        mode: Mode,
        value: String,
    },
    /// "a tone of true".
    Flag { property: String, value: bool },
    Always,
    Never,
}

impl PropertyQuery {
    /// Builds a k-of-set query. The `all` mode means "at least every target".
    pub fn list<I, P>(property: impl Into<String>, mode: &str, k: usize, targets: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<Primitive>,
    {
        let targets: Vec<Primitive> = targets.into_iter().map(Into::into).collect();
        let (mode, k) = if Mode::is_all_alias(mode) {
            (Mode::Geq, targets.len())
        } else {
            (parse_mode(mode)?, k)
        };
        Ok(PropertyQuery::List {
            property: property.into(),
            mode,
            k,
            targets,
        })
    }

    pub fn num(property: impl Into<String>, mode: &str, k: i64) -> Result<Self> {
        if Mode::is_all_alias(mode) {
            return Err(QueryError::Construction(
                "'all' is not a valid mode for numerical queries".to_string(),
            ));
        }
        Ok(PropertyQuery::Num {
            property: property.into(),
            mode: parse_mode(mode)?,
            k,
        })
    }

    pub fn text(property: impl Into<String>, mode: &str, value: impl Into<String>) -> Result<Self> {
        let parsed = parse_mode(mode)?;
        if !matches!(parsed, Mode::Eq | Mode::Neq) {
            return Err(QueryError::Construction(format!(
                "'{mode}' is not a valid mode for text queries"
            )));
        }
        Ok(PropertyQuery::Text {
            property: property.into(),
            mode: parsed,
            value: value.into(),
        })
    }

    pub fn flag(property: impl Into<String>, value: bool) -> Self {
        PropertyQuery::Flag {
            property: property.into(),
            value,
        }
    }

    /// The property this query reads, if any.
    pub fn property(&self) -> Option<&str> {
        match self {
            PropertyQuery::List { property, .. }
            | PropertyQuery::Num { property, .. }
            | PropertyQuery::Text { property, .. }
            | PropertyQuery::Flag { property, .. } => Some(property),
            PropertyQuery::Always | PropertyQuery::Never => None,
        }
    }

    /// A plain-English description of what a match has, e.g.
    /// `"have at least 2 of p, t, k"`.
    pub fn describe(&self) -> String {
        match self {
            PropertyQuery::List {
                mode, k, targets, ..
            } => {
                let targets: Vec<String> = targets.iter().map(ToString::to_string).collect();
                format!("have {} {k} of {}", mode.phrase(), targets.join(", "))
            }
            PropertyQuery::Num { property, mode, k } => {
                format!("have a {} of {} {k}", display_property(property), mode.phrase())
            }
            PropertyQuery::Text {
                property,
                mode: Mode::Neq,
                value,
            } => format!("have a {} other than {value}", display_property(property)),
            PropertyQuery::Text {
                property, value, ..
            } => format!("have a {} of {value}", display_property(property)),
            PropertyQuery::Flag { property, value } => {
                format!("have a {} of {value}", display_property(property))
            }
            PropertyQuery::Always => "match unconditionally".to_string(),
            PropertyQuery::Never => "never match".to_string(),
        }
    }

    /// Runs this query over every language.
    ///
    /// Languages without the property, or with a value of the wrong shape,
    /// are recorded as "no data" and excluded.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Quorum`] if too few languages had data.
    pub fn run(&self, languages: &LanguageSet, quorum: &QuorumPolicy) -> Result<Matches> {
        let Some(property) = self.property() else {
            let positions: Vec<usize> = match self {
                PropertyQuery::Always => (0..languages.len()).collect(),
                _ => Vec::new(),
            };
            return Ok(Matches::new(self.clone(), languages, positions, Vec::new(), Vec::new()));
        };

        let mut positions = Vec::new();
        let mut causes = Vec::new();
        let mut no_data = Vec::new();
        for (i, language) in languages.iter().enumerate() {
            let Some(value) = language.get(property) else {
                no_data.push(language.clone());
                continue;
            };
            match self.evaluate(value) {
                Outcome::Matched(cause) => {
                    positions.push(i);
                    causes.push(cause);
                }
                Outcome::Unmatched => {}
                Outcome::Unusable => {
                    warn!(
                        event = "unusable_datapoint",
                        language = language.name(),
                        property,
                        found = value.type_name(),
                    );
                    no_data.push(language.clone());
                }
            }
        }

        if !no_data.is_empty() {
            warn!(
                event = "missing_datapoints",
                property,
                missing = no_data.len(),
                total = languages.len(),
            );
        }
        quorum.check(property, languages.len() - no_data.len(), languages.len())?;

        debug!(event = "property_query", property, matched = positions.len());
        Ok(Matches::new(self.clone(), languages, positions, causes, no_data))
    }

    fn evaluate(&self, value: &DatapointValue) -> Outcome {
        match self {
            PropertyQuery::List {
                mode, k, targets, ..
            } => match value.as_collection() {
                Some(items) => match match_set(items, targets, *k, *mode) {
                    SetMatch::Match(elements) => Outcome::Matched(Cause::Elements(elements)),
                    SetMatch::NoMatch => Outcome::Unmatched,
                },
                None => Outcome::Unusable,
            },
            PropertyQuery::Num { mode, k, .. } => match value.as_primitive() {
                Some(p @ (Primitive::Int(_) | Primitive::Float(_))) => {
                    match compare_primitives(*mode, p, &Primitive::Int(*k)) {
                        Some(true) => Outcome::Matched(Cause::Value(value.clone())),
                        Some(false) => Outcome::Unmatched,
                        None => Outcome::Unusable,
                    }
                }
                _ => Outcome::Unusable,
            },
            PropertyQuery::Text {
                mode,
                value: expected,
                ..
            } => match value.as_text() {
                Some(text) => {
                    if (text == expected) == (*mode == Mode::Eq) {
                        Outcome::Matched(Cause::Value(value.clone()))
                    } else {
                        Outcome::Unmatched
                    }
                }
                None => Outcome::Unusable,
            },
            PropertyQuery::Flag {
                value: expected, ..
            } => match value.as_bool() {
                Some(b) if b == *expected => Outcome::Matched(Cause::None),
                Some(_) => Outcome::Unmatched,
                None => Outcome::Unusable,
            },
            PropertyQuery::Always => Outcome::Matched(Cause::None),
            PropertyQuery::Never => Outcome::Unmatched,
        }
    }
}

impl fmt::Display for PropertyQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

fn parse_mode(mode: &str) -> Result<Mode> {
    mode.parse()
        .map_err(|err: lingdb_core::LingDbError| QueryError::Construction(err.to_string()))
}

fn display_property(property: &str) -> String {
    property.replace('_', " ")
}

enum Outcome {
    Matched(Cause),
    Unmatched,
    Unusable,
}

/// Why a language matched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cause {
    /// The target elements the language has, in its own order.
    Elements(Vec<Primitive>),
    /// The language's value for the property.
    Value(DatapointValue),
    None,
}

/// A language that matched, with its cause.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub language: Language,
    pub cause: Cause,
}

/// The outcome of a [`PropertyQuery`].
#[derive(Debug, Clone)]
pub struct Matches {
    query: PropertyQuery,
    matches: Vec<Match>,
    languages: LanguageSet,
    no_data: Vec<Language>,
}

impl Matches {
    fn new(
        query: PropertyQuery,
        source: &LanguageSet,
        positions: Vec<usize>,
        causes: Vec<Cause>,
        no_data: Vec<Language>,
    ) -> Self {
        let languages = source.select(positions.iter().copied());
        let mut causes = causes.into_iter();
        let matches = languages
            .iter()
            .map(|language| Match {
                language: language.clone(),
                cause: causes.next().unwrap_or(Cause::None),
            })
            .collect();
        Self {
            query,
            matches,
            languages,
            no_data,
        }
    }

    pub fn query(&self) -> &PropertyQuery {
        &self.query
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Match> {
        self.matches.iter()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// The matching languages, as a new set.
    pub fn languages(&self) -> &LanguageSet {
        &self.languages
    }

    /// Languages excluded because they had no usable value.
    pub fn no_data(&self) -> &[Language] {
        &self.no_data
    }

    /// Counts how often each cause element occurs across matches, most
    /// common first; ties keep first-seen order.
    ///
    /// Empty unless every cause is a list of elements.
    pub fn cause_frequencies(&self) -> Vec<(Primitive, usize)> {
        let mut counts: Vec<(Primitive, usize)> = Vec::new();
        for m in &self.matches {
            let Cause::Elements(elements) = &m.cause else {
                return Vec::new();
            };
            for element in elements {
                match counts.iter_mut().find(|(seen, _)| values_equal(seen, element)) {
                    Some((_, count)) => *count += 1,
                    None => counts.push((element.clone(), 1)),
                }
            }
        }
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }

    /// Describes what the matches have, e.g. `"have at least 2 of p, t, k"`.
    pub fn describe(&self) -> String {
        self.query.describe()
    }
}

impl<'a> IntoIterator for &'a Matches {
    type Item = &'a Match;
    type IntoIter = std::slice::Iter<'a, Match>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Matches {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.len() == 1 { "language" } else { "languages" };
        write!(f, "{} {noun} {}", self.len(), self.describe())
    }
}

#[derive(Serialize)]
struct MatchesRecord<'a> {
    description: String,
    matches: Vec<MatchRecord<'a>>,
    graph: Vec<(Primitive, usize)>,
    no_data: Vec<&'a str>,
}

#[derive(Serialize)]
struct MatchRecord<'a> {
    language: &'a str,
    cause: &'a Cause,
}

impl Serialize for Matches {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        MatchesRecord {
            description: self.to_string(),
            matches: self
                .matches
                .iter()
                .map(|m| MatchRecord {
                    language: m.language.name(),
                    cause: &m.cause,
                })
                .collect(),
            graph: self.cause_frequencies(),
            no_data: self.no_data.iter().map(Language::name).collect(),
        }
        .serialize(serializer)
    }
}
