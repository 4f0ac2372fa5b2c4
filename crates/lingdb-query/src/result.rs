//! Query results and the per-step state the engine threads through a query.

use std::fmt;

use lingdb_core::{Context, Language, LanguageSet};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use tracing::warn;

use crate::error::{QueryError, Result};
use crate::quorum::QuorumPolicy;
use crate::transform::{TransformError, TransformKind, Transformation};

/// The running value for one language: the Language itself before any
/// transformation, and a context value afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultValue {
    Language(Language),
    Context(Context),
}

impl ResultValue {
    pub fn as_context(&self) -> Option<&Context> {
        match self {
            ResultValue::Context(context) => Some(context),
            ResultValue::Language(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_context().and_then(Context::as_bool)
    }

    /// Returns the short name of this value's type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            ResultValue::Language(_) => "language",
            ResultValue::Context(context) => context.type_name(),
        }
    }
}

impl fmt::Display for ResultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultValue::Language(language) => write!(f, "{language}"),
            ResultValue::Context(context) => write!(f, "{context}"),
        }
    }
}

// Languages serialize as their name so results are always plain JSON.
impl Serialize for ResultValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ResultValue::Language(language) => serializer.serialize_str(language.name()),
            ResultValue::Context(context) => context.serialize(serializer),
        }
    }
}

/// One result per language in the active LanguageSet, positionally aligned.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultSet {
    /// No transformation has run yet.
    Languages(LanguageSet),
    Contexts(Vec<Context>),
}

impl ResultSet {
    pub fn len(&self) -> usize {
        match self {
            ResultSet::Languages(set) => set.len(),
            ResultSet::Contexts(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_languages(&self) -> bool {
        matches!(self, ResultSet::Languages(_))
    }

    /// Returns the result at `index`.
    pub fn get(&self, index: usize) -> Option<ResultValue> {
        match self {
            ResultSet::Languages(set) => set
                .as_slice()
                .get(index)
                .cloned()
                .map(ResultValue::Language),
            ResultSet::Contexts(values) => values.get(index).cloned().map(ResultValue::Context),
        }
    }

    pub fn values(&self) -> Vec<ResultValue> {
        (0..self.len()).filter_map(|i| self.get(i)).collect()
    }
}

/// One context value per language, captured by a single `extract_context()`.
///
/// Snapshots are never rewritten by later filters; each remembers the
/// languages it was taken over.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextSet {
    step: usize,
    languages: Vec<Language>,
    values: Vec<Context>,
}

impl ContextSet {
    /// The index of the directive that captured this snapshot.
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn values(&self) -> &[Context] {
        &self.values
    }

    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the context captured for `language`, if it was active at capture time.
    pub fn get(&self, language: &Language) -> Option<&Context> {
        self.languages
            .iter()
            .position(|l| l == language)
            .and_then(|i| self.values.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Language, &Context)> {
        self.languages.iter().zip(&self.values)
    }
}

/// A language excluded from a query because it lacked a datapoint.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MissingData {
    pub step: usize,
    pub field: String,
    pub language: String,
}

/// One serialized row of a result: a language and everything known about it.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ResultRow {
    pub language: String,
    pub result: ResultValue,
    pub contexts: Vec<Option<Context>>,
    pub rationale: Option<Context>,
}

/// The output of evaluating a Query.
///
/// Keeps the history of every LanguageSet and ResultSet the evaluation
/// passed through, for debugging.
#[derive(Debug, Clone)]
pub struct QueryResult {
    language_sets: Vec<LanguageSet>,
    result_sets: Vec<ResultSet>,
    contexts: Vec<ContextSet>,
    rationale: Vec<Option<Context>>,
    no_data: Vec<MissingData>,
}

impl QueryResult {
    /// Starts from the identity case: languages and results are both the input set.
    pub fn new(language_set: LanguageSet) -> Self {
        let rationale = vec![None; language_set.len()];
        Self {
            language_sets: vec![language_set.clone()],
            result_sets: vec![ResultSet::Languages(language_set)],
            contexts: Vec::new(),
            rationale,
            no_data: Vec::new(),
        }
    }

    /// The current (possibly filtered) LanguageSet.
    pub fn language_set(&self) -> &LanguageSet {
        // Never empty: seeded in `new` and only ever appended to.
        &self.language_sets[self.language_sets.len() - 1]
    }

    /// The current results, aligned with [`QueryResult::language_set`].
    pub fn result_set(&self) -> &ResultSet {
        &self.result_sets[self.result_sets.len() - 1]
    }

    pub fn contexts(&self) -> &[ContextSet] {
        &self.contexts
    }

    /// The latest non-predicate output for each active language.
    pub fn rationale(&self) -> &[Option<Context>] {
        &self.rationale
    }

    pub fn no_data(&self) -> &[MissingData] {
        &self.no_data
    }

    pub fn language_set_history(&self) -> &[LanguageSet] {
        &self.language_sets
    }

    pub fn result_set_history(&self) -> &[ResultSet] {
        &self.result_sets
    }

    /// Pairs every active language with its result, contexts and rationale.
    pub fn rows(&self) -> Vec<ResultRow> {
        let results = self.result_set();
        self.language_set()
            .iter()
            .enumerate()
            .map(|(i, language)| ResultRow {
                language: language.name().to_string(),
                result: results
                    .get(i)
                    .unwrap_or_else(|| ResultValue::Language(language.clone())),
                contexts: self
                    .contexts
                    .iter()
                    .map(|set| set.get(language).cloned())
                    .collect(),
                rationale: self.rationale.get(i).cloned().flatten(),
            })
            .collect()
    }

    pub(crate) fn apply(
        &mut self,
        step: usize,
        transformation: &dyn Transformation,
        quorum: &QuorumPolicy,
    ) -> Result<()> {
        let language_set = self.language_set().clone();
        let inputs = self.result_set().values();
        let is_extractor = transformation.kind() == TransformKind::Extractor;

        let mut outputs = Vec::with_capacity(inputs.len());
        let mut kept = Vec::with_capacity(inputs.len());
        for (i, (language, input)) in language_set.iter().zip(&inputs).enumerate() {
            match transformation.apply(input) {
                Ok(output) => {
                    outputs.push(output);
                    kept.push(i);
                }
                Err(TransformError::MissingDatapoint { field, .. }) if is_extractor => {
                    warn!(
                        event = "missing_datapoint",
                        step,
                        language = language.name(),
                        field = %field,
                    );
                    self.no_data.push(MissingData {
                        step,
                        field,
                        language: language.name().to_string(),
                    });
                }
                Err(source) => {
                    return Err(QueryError::Transformation {
                        step,
                        transformation: transformation.name().to_string(),
                        language: language.name().to_string(),
                        source,
                    })
                }
            }
        }

        if let (true, Some(field)) = (is_extractor, transformation.field()) {
            quorum.check(field, kept.len(), language_set.len())?;
        }

        if kept.len() < language_set.len() {
            self.realign(&kept);
            self.language_sets.push(language_set.select(kept));
        }
        if transformation.kind() != TransformKind::Predicate {
            self.rationale = outputs.iter().cloned().map(Some).collect();
        }
        self.result_sets.push(ResultSet::Contexts(outputs));
        Ok(())
    }

    pub(crate) fn extract_context(&mut self, step: usize) -> Result<()> {
        let values = match self.result_set() {
            ResultSet::Languages(_) => return Err(QueryError::ContextFromLanguages { step }),
            ResultSet::Contexts(values) => values.clone(),
        };
        let languages = self.language_set().iter().cloned().collect();
        self.contexts.push(ContextSet {
            step,
            languages,
            values,
        });
        Ok(())
    }

    pub(crate) fn filter_languages(&mut self, step: usize) -> Result<()> {
        let language_set = self.language_set().clone();
        let values = match self.result_set() {
            ResultSet::Contexts(values) => values.clone(),
            ResultSet::Languages(set) => match set.iter().next() {
                Some(first) => {
                    return Err(QueryError::NonBooleanFilter {
                        step,
                        language: first.name().to_string(),
                        found: "language".to_string(),
                    })
                }
                None => return Ok(()),
            },
        };

        let mut kept = Vec::with_capacity(values.len());
        let mut kept_values = Vec::with_capacity(values.len());
        for (i, (language, value)) in language_set.iter().zip(values).enumerate() {
            match value.as_bool() {
                Some(true) => {
                    kept.push(i);
                    kept_values.push(value);
                }
                Some(false) => {}
                None => {
                    return Err(QueryError::NonBooleanFilter {
                        step,
                        language: language.name().to_string(),
                        found: value.type_name().to_string(),
                    })
                }
            }
        }

        self.realign(&kept);
        self.language_sets.push(language_set.select(kept));
        self.result_sets.push(ResultSet::Contexts(kept_values));
        Ok(())
    }

    fn realign(&mut self, kept: &[usize]) {
        self.rationale = kept
            .iter()
            .map(|&i| self.rationale.get(i).cloned().flatten())
            .collect();
    }
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn truncate<T: fmt::Display>(items: &[T]) -> String {
            const MAX_ITEMS: usize = 5;
            let shown: Vec<String> = items.iter().take(MAX_ITEMS).map(T::to_string).collect();
            if items.len() > MAX_ITEMS {
                format!("[{}, ...]", shown.join(", "))
            } else {
                format!("[{}]", shown.join(", "))
            }
        }

        let results = self.result_set().values();
        let contexts: Vec<String> = self.contexts.iter().map(|c| truncate(c.values())).collect();
        write!(
            f,
            "<{} results: {}, contexts=[{}]>",
            results.len(),
            truncate(&results),
            contexts.join(", ")
        )
    }
}

impl Serialize for QueryResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let rows = self.rows();
        let mut seq = serializer.serialize_seq(Some(rows.len()))?;
        for row in &rows {
            seq.serialize_element(row)?;
        }
        seq.end()
    }
}
