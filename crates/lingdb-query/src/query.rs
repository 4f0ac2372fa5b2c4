//! Query construction and evaluation.

use std::fmt;
use std::sync::Arc;

use lingdb_core::LanguageSet;
use tracing::{debug, info};

use crate::directive::QueryDirective;
use crate::error::Result;
use crate::quorum::QuorumPolicy;
use crate::result::QueryResult;
use crate::transform::Transformation;

/// One element of a query chain.
#[derive(Debug, Clone)]
pub enum Step {
    Transform(Arc<dyn Transformation>),
    Directive(QueryDirective),
}

impl Step {
    pub fn name(&self) -> &str {
        match self {
            Step::Transform(t) => t.name(),
            Step::Directive(d) => d.name(),
        }
    }

    fn kind(&self) -> String {
        match self {
            Step::Transform(t) => t.kind().to_string(),
            Step::Directive(_) => "directive".to_string(),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An ordered chain of transformations and directives, applied to a
/// LanguageSet as a strict left-to-right fold.
///
/// # Example
///
/// ```
/// use lingdb_query::transform::{Comparison, Get, Intersection};
/// use lingdb_query::Query;
///
/// let query = Query::new()
///     .apply(Get::new("consonants"))
///     .apply(Intersection::new(["p", "t", "k"]))
///     .extract_context()
///     .apply(Comparison::at_least(2i64))
///     .filter();
/// assert_eq!(query.len(), 5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Query {
    steps: Vec<Step>,
    quorum: QuorumPolicy,
}

impl Query {
    /// Creates an empty query, the identity over any LanguageSet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a transformation.
    pub fn apply(self, transformation: impl Transformation + 'static) -> Self {
        self.apply_shared(Arc::new(transformation))
    }

    /// Appends an already shared transformation.
    pub fn apply_shared(mut self, transformation: Arc<dyn Transformation>) -> Self {
        self.steps.push(Step::Transform(transformation));
        self
    }

    /// Appends a directive.
    pub fn directive(mut self, directive: QueryDirective) -> Self {
        self.steps.push(Step::Directive(directive));
        self
    }

    /// Captures the current result of every language as context.
    pub fn extract_context(self) -> Self {
        self.directive(QueryDirective::ExtractContext)
    }

    /// Keeps only the languages whose current result is `true`.
    pub fn filter(self) -> Self {
        self.directive(QueryDirective::FilterLanguageSet)
    }

    /// Sets the fraction of languages that must have each extracted field.
    pub fn with_quorum(mut self, threshold: f64) -> Self {
        self.quorum = QuorumPolicy::new(threshold);
        self
    }

    pub fn with_quorum_policy(mut self, quorum: QuorumPolicy) -> Self {
        self.quorum = quorum;
        self
    }

    pub fn quorum(&self) -> &QuorumPolicy {
        &self.quorum
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Evaluates this query against `language_set`.
    ///
    /// # Errors
    ///
    /// Any transformation failure other than an extractor's missing datapoint
    /// aborts evaluation, as does a failed quorum check, context extraction
    /// before any transformation, or a filter over non-bool results.
    pub fn evaluate(&self, language_set: &LanguageSet) -> Result<QueryResult> {
        info!(
            event = "query_start",
            steps = self.steps.len(),
            languages = language_set.len(),
        );

        let mut result = QueryResult::new(language_set.clone());
        for (step, element) in self.steps.iter().enumerate() {
            debug!(
                event = "query_step",
                step,
                step_name = element.name(),
                kind = %element.kind(),
                languages = result.language_set().len(),
            );
            match element {
                Step::Transform(transformation) => {
                    result.apply(step, transformation.as_ref(), &self.quorum)?
                }
                Step::Directive(QueryDirective::ExtractContext) => result.extract_context(step)?,
                Step::Directive(QueryDirective::FilterLanguageSet) => {
                    result.filter_languages(step)?
                }
            }
        }

        info!(
            event = "query_end",
            languages = result.language_set().len(),
            contexts = result.contexts().len(),
            no_data = result.no_data().len(),
        );
        Ok(result)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.steps.iter().map(Step::name).collect();
        write!(f, "Query[{}]", names.join(" -> "))
    }
}
