//! Tests for lingdb configuration.

use std::io::Write;

use super::*;

#[test]
fn test_defaults() {
    let config = LingDbConfig::default();
    assert_eq!(config.datasets_dir, PathBuf::from("data/datasets"));
    assert_eq!(config.latest_dataset(), Some("F22"));
    assert_eq!(config.log_filter, "lingdb=info");
    assert_eq!(config.query.quorum_threshold, 0.5);
    assert_eq!(config.query.list_delimiter, ";");
    assert!(config.validate().is_ok());
}

#[test]
fn test_toml_parsing() {
    let toml = r#"
        datasets_dir = "/srv/datasets"
        datasets = ["_test", "F22"]
        latest = "_test"
        log_filter = "lingdb=debug"

        [query]
        quorum_threshold = 0.25
        list_delimiter = ","
    "#;

    let config = LingDbConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.datasets_dir, PathBuf::from("/srv/datasets"));
    assert_eq!(config.datasets, vec!["_test", "F22"]);
    assert_eq!(config.latest_dataset(), Some("_test"));
    assert_eq!(config.log_filter, "lingdb=debug");
    assert_eq!(config.query.quorum_threshold, 0.25);
    assert_eq!(config.query.list_delimiter, ",");
}

#[test]
fn test_toml_partial_uses_defaults() {
    let config = LingDbConfig::from_toml_str("datasets = [\"F21\"]").unwrap();
    assert_eq!(config.datasets_dir, PathBuf::from("data/datasets"));
    assert_eq!(config.latest_dataset(), Some("F21"));
    assert_eq!(config.query, QueryConfig::default());
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        datasets_dir: fixtures
        datasets:
          - S19
          - F19
        query:
          quorum_threshold: 1.0
    "#;

    let config = LingDbConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.datasets_dir, PathBuf::from("fixtures"));
    assert_eq!(config.latest_dataset(), Some("F19"));
    assert_eq!(config.query.quorum_threshold, 1.0);
    assert_eq!(config.query.list_delimiter, ";");
}

#[test]
fn test_builder() {
    let config = LingDbConfig::new()
        .with_datasets_dir("/tmp/lingdb")
        .with_datasets(["A", "B", "C"])
        .with_latest("B")
        .with_log_filter("lingdb=trace")
        .with_quorum_threshold(0.9)
        .with_list_delimiter("|");

    assert_eq!(config.latest_dataset(), Some("B"));
    assert_eq!(
        config.dataset_path("C"),
        PathBuf::from("/tmp/lingdb/C/C.json")
    );
    assert_eq!(config.query.quorum_threshold, 0.9);
    assert_eq!(config.query.list_delimiter, "|");
    assert!(config.validate().is_ok());
}

#[test]
fn test_validation() {
    let bad_threshold = LingDbConfig::new().with_quorum_threshold(1.5);
    assert!(matches!(
        bad_threshold.validate(),
        Err(ConfigError::Invalid(_))
    ));

    let undeclared = LingDbConfig::new().with_latest("F99");
    assert!(matches!(undeclared.validate(), Err(ConfigError::Invalid(_))));

    let empty = LingDbConfig::new().with_datasets(Vec::<String>::new());
    assert!(empty.validate().is_err());
    assert_eq!(empty.latest_dataset(), None);

    assert!(LingDbConfig::from_toml_str("[query]\nlist_delimiter = \"\"").is_err());
}

#[test]
fn test_parse_errors() {
    assert!(matches!(
        LingDbConfig::from_toml_str("datasets = 3"),
        Err(ConfigError::Toml(_))
    ));
    assert!(matches!(
        LingDbConfig::from_yaml_str("datasets: {"),
        Err(ConfigError::Yaml(_))
    ));
}

#[test]
fn test_load_by_extension() {
    let dir = tempfile::tempdir().unwrap();

    let toml_path = dir.path().join("lingdb.toml");
    let mut file = std::fs::File::create(&toml_path).unwrap();
    writeln!(file, "datasets = [\"F22\"]").unwrap();
    assert_eq!(LingDbConfig::load(&toml_path).unwrap().datasets, vec!["F22"]);

    let yaml_path = dir.path().join("lingdb.yml");
    std::fs::write(&yaml_path, "datasets: [F21]\n").unwrap();
    assert_eq!(LingDbConfig::load(&yaml_path).unwrap().datasets, vec!["F21"]);

    assert!(matches!(
        LingDbConfig::load(dir.path().join("missing.toml")),
        Err(ConfigError::Io(_))
    ));
}
