//! Configuration system for lingdb.
//!
//! Load dataset locations, logging defaults and query tolerances from TOML
//! or YAML files without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use lingdb_config::LingDbConfig;
//!
//! let config = LingDbConfig::from_toml_str(r#"
//!     datasets_dir = "/srv/lingdb/datasets"
//!     datasets = ["F21", "F22"]
//!
//!     [query]
//!     quorum_threshold = 0.75
//! "#).unwrap();
//!
//! assert_eq!(config.latest_dataset(), Some("F22"));
//! assert_eq!(config.query.quorum_threshold, 0.75);
//! assert_eq!(config.query.list_delimiter, ";");
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use lingdb_config::LingDbConfig;
//!
//! let config = LingDbConfig::load("lingdb.toml").unwrap_or_default();
//! // Proceeds with defaults if file doesn't exist
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Datasets known to lingdb, in declaration order. The last one is the
/// latest.
pub const DEFAULT_DATASETS: &[&str] = &["_test", "F17", "S19", "F19", "F21", "F22"];

/// Main lingdb configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LingDbConfig {
    /// Directory holding one `<NAME>/<NAME>.json` file per dataset.
    #[serde(default = "default_datasets_dir")]
    pub datasets_dir: PathBuf,

    /// Dataset names in declaration order.
    #[serde(default = "default_datasets")]
    pub datasets: Vec<String>,

    /// Dataset used when a request names none. Defaults to the last
    /// declared dataset.
    #[serde(default)]
    pub latest: Option<String>,

    /// Default `tracing` filter, overridden by `RUST_LOG`.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    #[serde(default)]
    pub query: QueryConfig,
}

fn default_datasets_dir() -> PathBuf {
    PathBuf::from("data/datasets")
}

fn default_datasets() -> Vec<String> {
    DEFAULT_DATASETS.iter().map(|s| s.to_string()).collect()
}

fn default_log_filter() -> String {
    "lingdb=info".to_string()
}

impl Default for LingDbConfig {
    fn default() -> Self {
        Self {
            datasets_dir: default_datasets_dir(),
            datasets: default_datasets(),
            latest: None,
            log_filter: default_log_filter(),
            query: QueryConfig::default(),
        }
    }
}

impl LingDbConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file, picking YAML for `.yaml`/`.yml`
    /// extensions and TOML otherwise.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist, can't be parsed, or fails
    /// validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_datasets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.datasets_dir = dir.into();
        self
    }

    pub fn with_datasets<I, S>(mut self, datasets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.datasets = datasets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_latest(mut self, latest: impl Into<String>) -> Self {
        self.latest = Some(latest.into());
        self
    }

    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    pub fn with_quorum_threshold(mut self, threshold: f64) -> Self {
        self.query.quorum_threshold = threshold;
        self
    }

    pub fn with_list_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.query.list_delimiter = delimiter.into();
        self
    }

    /// The dataset used when a request names none.
    pub fn latest_dataset(&self) -> Option<&str> {
        self.latest
            .as_deref()
            .or_else(|| self.datasets.last().map(String::as_str))
    }

    /// Path of the JSON file for dataset `name`, e.g.
    /// `data/datasets/F22/F22.json`.
    pub fn dataset_path(&self, name: &str) -> PathBuf {
        self.datasets_dir.join(name).join(format!("{name}.json"))
    }

    /// Checks the configuration for values no query could run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.query.quorum_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::Invalid(format!(
                "quorum_threshold must be within [0, 1], got {threshold}"
            )));
        }
        if self.query.list_delimiter.is_empty() {
            return Err(ConfigError::Invalid(
                "list_delimiter must not be empty".to_string(),
            ));
        }
        if self.datasets.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one dataset must be declared".to_string(),
            ));
        }
        if let Some(latest) = &self.latest {
            if !self.datasets.iter().any(|d| d == latest) {
                return Err(ConfigError::Invalid(format!(
                    "latest dataset '{latest}' is not declared"
                )));
            }
        }
        Ok(())
    }
}

/// Query evaluation settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct QueryConfig {
    /// Minimum fraction of languages that must have an extracted field.
    #[serde(default = "default_quorum_threshold")]
    pub quorum_threshold: f64,

    /// Separator between list elements in request token values.
    #[serde(default = "default_list_delimiter")]
    pub list_delimiter: String,
}

fn default_quorum_threshold() -> f64 {
    0.5
}

fn default_list_delimiter() -> String {
    ";".to_string()
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            quorum_threshold: default_quorum_threshold(),
            list_delimiter: default_list_delimiter(),
        }
    }
}

#[cfg(test)]
mod tests;
