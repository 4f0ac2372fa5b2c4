//! Request handling: from tokens to serializable query responses.

use std::sync::Arc;

use lingdb_config::LingDbConfig;
use lingdb_query::{MissingData, QueryResult, QuorumPolicy, ResultRow};
use serde::Serialize;
use tracing::info;

use crate::dataset::DatasetCatalog;
use crate::error::Result;
use crate::registry::Registry;
use crate::tokens::{parse_query_string, requested_dataset, split_query_specs, Token, DATASET_KEY};

/// The outcome of one query in a request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResponse {
    pub dataset: String,
    pub query_tokens: Vec<Token>,
    pub results: Vec<ResultRow>,
    pub no_data: Vec<MissingData>,
}

impl QueryResponse {
    fn new(dataset: &str, spec: Vec<Token>, result: &QueryResult) -> Self {
        Self {
            dataset: dataset.to_string(),
            query_tokens: spec,
            results: result.rows(),
            no_data: result.no_data().to_vec(),
        }
    }
}

/// Runs the queries in a request against a shared dataset catalog.
#[derive(Debug, Clone)]
pub struct RequestHandler {
    catalog: Arc<DatasetCatalog>,
    registry: Arc<Registry>,
    quorum: QuorumPolicy,
}

impl RequestHandler {
    pub fn new(catalog: DatasetCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            registry: Arc::new(Registry::standard()),
            quorum: QuorumPolicy::default(),
        }
    }

    /// Loads every configured dataset and applies the configured query
    /// settings.
    pub fn from_config(config: &LingDbConfig) -> Result<Self> {
        let catalog = DatasetCatalog::load(config)?;
        Ok(Self::configured(catalog, config))
    }

    /// Serves an already loaded catalog with the configured query settings.
    pub fn configured(catalog: DatasetCatalog, config: &LingDbConfig) -> Self {
        Self::new(catalog)
            .with_registry(Registry::standard().with_list_delimiter(&config.query.list_delimiter))
            .with_quorum(QuorumPolicy::new(config.query.quorum_threshold))
    }

    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    pub fn with_quorum(mut self, quorum: QuorumPolicy) -> Self {
        self.quorum = quorum;
        self
    }

    pub fn catalog(&self) -> &DatasetCatalog {
        &self.catalog
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Runs every query in `tokens`, in order.
    ///
    /// A request with no queries returns the latest dataset unfiltered.
    ///
    /// # Errors
    ///
    /// The first failing query fails the whole request; see
    /// [`BindingError::status`](crate::BindingError::status) for how to
    /// report it.
    pub fn handle(&self, tokens: &[Token]) -> Result<Vec<QueryResponse>> {
        let mut specs = split_query_specs(tokens);
        if specs.is_empty() {
            specs.push(vec![(
                DATASET_KEY.to_string(),
                self.catalog.latest().to_string(),
            )]);
        }
        info!(event = "request_start", queries = specs.len());

        let mut responses = Vec::with_capacity(specs.len());
        for spec in specs {
            let dataset = requested_dataset(&spec)
                .unwrap_or_else(|| self.catalog.latest())
                .to_string();
            let languages = self.catalog.get(&dataset)?;
            let query = self
                .registry
                .build_query(&spec)?
                .with_quorum_policy(self.quorum);
            let result = query.evaluate(languages)?;
            responses.push(QueryResponse::new(&dataset, spec, &result));
        }

        info!(event = "request_end", queries = responses.len());
        Ok(responses)
    }

    /// Decodes a URL query string and handles it.
    pub fn handle_query_string(&self, query: &str) -> Result<Vec<QueryResponse>> {
        self.handle(&parse_query_string(query))
    }
}
