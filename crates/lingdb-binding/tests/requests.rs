//! End-to-end request tests against datasets on disk.

use std::path::Path;

use lingdb_binding::{BindingError, DatasetCatalog, RequestHandler, ResponseStatus};
use lingdb_config::LingDbConfig;
use lingdb_test::{partial_tone, three_languages_json};
use serde_json::{json, Value};
use tempfile::TempDir;

fn write_dataset(dir: &Path, name: &str, contents: &Value) {
    let dataset_dir = dir.join(name);
    std::fs::create_dir_all(&dataset_dir).unwrap();
    std::fs::write(
        dataset_dir.join(format!("{name}.json")),
        serde_json::to_string_pretty(contents).unwrap(),
    )
    .unwrap();
}

/// `partial` and `_test` on disk; `F21` declared but absent. `_test` is latest.
fn fixture() -> (TempDir, LingDbConfig) {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path(), "_test", &three_languages_json());
    write_dataset(
        dir.path(),
        "partial",
        &serde_json::to_value(partial_tone()).unwrap(),
    );
    let config = LingDbConfig::new()
        .with_datasets_dir(dir.path())
        .with_datasets(["partial", "F21", "_test"]);
    (dir, config)
}

fn handler() -> (TempDir, RequestHandler) {
    let (dir, config) = fixture();
    let handler = RequestHandler::from_config(&config).unwrap();
    (dir, handler)
}

#[test]
fn test_catalog_skips_failed_datasets() {
    let (_dir, config) = fixture();
    let catalog = DatasetCatalog::load(&config).unwrap();
    assert_eq!(catalog.names(), vec!["partial", "_test"]);
    assert_eq!(catalog.latest(), "_test");
    assert!(matches!(
        catalog.get("F21"),
        Err(BindingError::FailedLoadingDataset(ref name)) if name == "F21"
    ));
}

#[test]
fn test_catalog_requires_latest() {
    let (_dir, config) = fixture();
    let config = config.with_latest("F21");
    let err = DatasetCatalog::load(&config).unwrap_err();
    assert_eq!(err.status(), ResponseStatus::InternalError);
}

#[test]
fn test_empty_request_returns_latest_dataset() {
    let (_dir, handler) = handler();
    let responses = handler.handle(&[]).unwrap();
    assert_eq!(responses.len(), 1);

    let response = &responses[0];
    assert_eq!(response.dataset, "_test");
    assert_eq!(
        response.query_tokens,
        vec![("Dataset".to_string(), "_test".to_string())]
    );
    let names: Vec<&str> = response.results.iter().map(|r| r.language.as_str()).collect();
    assert_eq!(names, vec!["English", "French", "Spanish"]);
    assert!(response.no_data.is_empty());
}

#[test]
fn test_consonant_query_end_to_end() {
    let (_dir, handler) = handler();
    let responses = handler
        .handle_query_string(
            "Query=&Get=consonants&Intersection=p%3Bt%3Bk&ExtractContext=&Geq=2&FilterLanguages=",
        )
        .unwrap();
    assert_eq!(responses.len(), 1);

    let json = serde_json::to_value(&responses[0]).unwrap();
    assert_eq!(json["dataset"], "_test");
    assert_eq!(json["query_tokens"][1], json!(["Intersection", "p;t;k"]));

    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["language"], "English");
    assert_eq!(results[0]["result"], true);
    assert_eq!(results[0]["contexts"], json!([["p", "t", "k"]]));
    assert_eq!(results[0]["rationale"], json!(["p", "t", "k"]));
    assert_eq!(results[1]["language"], "Spanish");
    assert_eq!(results[1]["contexts"], json!([["p", "t"]]));
}

#[test]
fn test_multiple_queries_and_datasets() {
    let (_dir, handler) = handler();
    let responses = handler
        .handle_query_string(
            "Get=num%20consonants&Gt=8&FilterLanguageSet=\
             &Query=&Dataset=partial&HasTone=",
        )
        .unwrap();
    assert_eq!(responses.len(), 2);

    let first: Vec<&str> = responses[0].results.iter().map(|r| r.language.as_str()).collect();
    assert_eq!(first, vec!["French", "Spanish"]);

    assert_eq!(responses[1].dataset, "partial");
    assert_eq!(responses[1].results.len(), 2);
    assert_eq!(responses[1].no_data.len(), 1);
    assert_eq!(responses[1].no_data[0].language, "Lang2");
    assert_eq!(responses[1].no_data[0].field, "tone");
}

#[test]
fn test_unknown_token_rejects_request() {
    let (_dir, handler) = handler();
    let err = handler
        .handle_query_string("Get=name&Frobnicate=3")
        .unwrap_err();
    assert_eq!(err.status(), ResponseStatus::BadRequest);
    assert_eq!(err.to_string(), "token 1 was unrecognized: Frobnicate=3");
}

#[test]
fn test_dataset_token_must_lead() {
    let (_dir, handler) = handler();
    let err = handler
        .handle_query_string("GetName=&Dataset=partial")
        .unwrap_err();
    assert!(matches!(
        err,
        BindingError::UnknownToken { position: 1, .. }
    ));
}

#[test]
fn test_dataset_errors() {
    let (_dir, handler) = handler();

    let err = handler.handle_query_string("Dataset=F99").unwrap_err();
    assert!(matches!(err, BindingError::NoSuchDataset(ref name) if name == "F99"));
    assert_eq!(err.status(), ResponseStatus::BadRequest);

    let err = handler.handle_query_string("Dataset=F21").unwrap_err();
    assert_eq!(err.status(), ResponseStatus::InternalError);
    assert_eq!(err.status().http_code(), 500);
}

#[test]
fn test_missing_field_is_insufficient_data() {
    let (_dir, handler) = handler();
    let err = handler.handle_query_string("Get=vowels").unwrap_err();
    assert_eq!(err.status(), ResponseStatus::InsufficientData);
    assert_eq!(err.status().http_code(), 422);
}

#[test]
fn test_type_errors_are_bad_requests() {
    let (_dir, handler) = handler();
    let err = handler
        .handle_query_string("ExtractContext=")
        .unwrap_err();
    assert_eq!(err.status(), ResponseStatus::BadRequest);

    let err = handler
        .handle_query_string("GetNumConsonants=&FilterLanguages=")
        .unwrap_err();
    assert_eq!(err.status(), ResponseStatus::BadRequest);
}
