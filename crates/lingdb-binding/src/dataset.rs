//! The catalog of named datasets, loaded once at start-up.

use lingdb_config::{ConfigError, LingDbConfig};
use lingdb_core::LanguageSet;
use tracing::{info, warn};

use crate::error::{BindingError, Result};

/// Every declared dataset, with the ones that loaded.
///
/// Read-only once built; share it behind an `Arc` to serve concurrent
/// requests.
#[derive(Debug, Clone)]
pub struct DatasetCatalog {
    declared: Vec<String>,
    loaded: Vec<(String, LanguageSet)>,
    latest: String,
}

impl DatasetCatalog {
    /// Loads every dataset `config` declares.
    ///
    /// A dataset that fails to load is logged and skipped, so the rest stay
    /// available.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::FailedLoadingDataset`] if the latest dataset
    /// did not load.
    pub fn load(config: &LingDbConfig) -> Result<Self> {
        let latest = config
            .latest_dataset()
            .ok_or_else(|| ConfigError::Invalid("no datasets declared".to_string()))?
            .to_string();

        let mut loaded = Vec::new();
        for name in &config.datasets {
            let path = config.dataset_path(name);
            match LanguageSet::from_json_file(&path) {
                Ok(set) => {
                    info!(event = "dataset_loaded", dataset = %name, languages = set.len());
                    loaded.push((name.clone(), set));
                }
                Err(err) => {
                    warn!(
                        event = "dataset_failed",
                        dataset = %name,
                        path = %path.display(),
                        error = %err,
                    );
                }
            }
        }

        let catalog = Self {
            declared: config.datasets.clone(),
            loaded,
            latest,
        };
        catalog.latest_set()?;
        Ok(catalog)
    }

    /// Builds a catalog from sets already in memory; the last one is the latest.
    pub fn from_sets<I, S>(sets: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, LanguageSet)>,
        S: Into<String>,
    {
        let loaded: Vec<(String, LanguageSet)> = sets
            .into_iter()
            .map(|(name, set)| (name.into(), set))
            .collect();
        let latest = loaded
            .last()
            .map(|(name, _)| name.clone())
            .ok_or_else(|| ConfigError::Invalid("no datasets declared".to_string()))?;
        Ok(Self {
            declared: loaded.iter().map(|(name, _)| name.clone()).collect(),
            loaded,
            latest,
        })
    }

    /// Makes `name` the latest dataset.
    ///
    /// # Errors
    ///
    /// Fails as [`DatasetCatalog::get`] does if `name` is unavailable.
    pub fn with_latest(mut self, name: &str) -> Result<Self> {
        self.get(name)?;
        self.latest = name.to_string();
        Ok(self)
    }

    /// Returns the dataset called `name`.
    ///
    /// # Errors
    ///
    /// [`BindingError::NoSuchDataset`] if `name` was never declared, and
    /// [`BindingError::FailedLoadingDataset`] if it was declared but did not
    /// load.
    pub fn get(&self, name: &str) -> Result<&LanguageSet> {
        if let Some((_, set)) = self.loaded.iter().find(|(n, _)| n == name) {
            return Ok(set);
        }
        if self.declared.iter().any(|n| n == name) {
            Err(BindingError::FailedLoadingDataset(name.to_string()))
        } else {
            Err(BindingError::NoSuchDataset(name.to_string()))
        }
    }

    pub fn latest(&self) -> &str {
        &self.latest
    }

    /// The latest dataset's languages.
    pub fn latest_set(&self) -> Result<&LanguageSet> {
        self.get(&self.latest)
    }

    /// Names of the datasets that loaded, in declaration order.
    pub fn names(&self) -> Vec<&str> {
        self.loaded.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LanguageSet)> {
        self.loaded.iter().map(|(name, set)| (name.as_str(), set))
    }

    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use lingdb_test::{partial_tone, three_languages};

    use super::*;

    #[test]
    fn test_from_sets() {
        let catalog =
            DatasetCatalog::from_sets([("_test", three_languages()), ("partial", partial_tone())])
                .unwrap();
        assert_eq!(catalog.names(), vec!["_test", "partial"]);
        assert_eq!(catalog.latest(), "partial");
        assert_eq!(catalog.latest_set().unwrap().len(), 3);
        assert_eq!(catalog.get("_test").unwrap().len(), 3);
        assert!(matches!(
            catalog.get("F99"),
            Err(BindingError::NoSuchDataset(_))
        ));
    }

    #[test]
    fn test_with_latest() {
        let catalog = DatasetCatalog::from_sets([("a", three_languages()), ("b", partial_tone())])
            .unwrap()
            .with_latest("a")
            .unwrap();
        assert_eq!(catalog.latest(), "a");

        let missing = DatasetCatalog::from_sets([("a", three_languages())])
            .unwrap()
            .with_latest("zz");
        assert!(missing.is_err());
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let sets: Vec<(String, LanguageSet)> = Vec::new();
        assert!(matches!(
            DatasetCatalog::from_sets(sets),
            Err(BindingError::Config(_))
        ));
    }
}
