//! Tests for query evaluation and property queries.

use lingdb_core::{DatapointValue, Language, LanguageSet, Primitive};
use lingdb_test::{partial_tone, three_languages, with_present};
use proptest::prelude::*;

use crate::transform::{Bool, Comparison, Get, Intersection, Length};
use crate::*;

fn ptk_query() -> Query {
    Query::new()
        .apply(Get::new("consonants"))
        .apply(Intersection::new(["p", "t", "k"]))
        .extract_context()
        .apply(Comparison::at_least(2i64))
        .filter()
}

fn phonemes(items: &[&str]) -> DatapointValue {
    DatapointValue::collection(items.iter().copied())
}

#[test]
fn test_empty_query_is_identity() {
    let set = three_languages();
    let result = Query::new().evaluate(&set).unwrap();
    assert_eq!(result.language_set(), &set);
    assert_eq!(result.result_set(), &ResultSet::Languages(set.clone()));
    assert!(result.contexts().is_empty());
    assert!(result.no_data().is_empty());
}

#[test]
fn test_end_to_end_consonants() {
    let result = ptk_query().evaluate(&three_languages()).unwrap();

    let contexts = result.contexts();
    assert_eq!(contexts.len(), 1);
    assert_eq!(
        contexts[0].values(),
        &[
            phonemes(&["p", "t", "k"]),
            phonemes(&["k"]),
            phonemes(&["p", "t"])
        ]
    );
    assert_eq!(contexts[0].step(), 2);

    assert_eq!(result.language_set().names(), vec!["English", "Spanish"]);
    assert_eq!(
        result.result_set(),
        &ResultSet::Contexts(vec![true.into(), true.into()])
    );
    assert_eq!(
        result.rationale(),
        &[Some(phonemes(&["p", "t", "k"])), Some(phonemes(&["p", "t"]))]
    );
}

#[test]
fn test_rows_follow_filtered_languages() {
    let result = ptk_query().evaluate(&three_languages()).unwrap();
    let rows = result.rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].language, "Spanish");
    assert_eq!(rows[1].result, ResultValue::Context(true.into()));
    assert_eq!(rows[1].contexts, vec![Some(phonemes(&["p", "t"]))]);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json[0]["language"], "English");
    assert_eq!(json[0]["result"], true);
    assert_eq!(json[0]["contexts"][0], serde_json::json!(["p", "t", "k"]));
    assert_eq!(json[0]["rationale"], serde_json::json!(["p", "t", "k"]));
}

#[test]
fn test_contexts_are_snapshots() {
    let result = ptk_query()
        .extract_context()
        .evaluate(&three_languages())
        .unwrap();
    let contexts = result.contexts();
    assert_eq!(contexts.len(), 2);
    assert_eq!(contexts[0].len(), 3);
    assert_eq!(contexts[1].len(), 2);

    let french = three_languages().get("French").cloned().unwrap();
    assert_eq!(contexts[0].get(&french), Some(&phonemes(&["k"])));
    assert_eq!(contexts[1].get(&french), None);

    let rows = result.rows();
    assert_eq!(
        rows[0].contexts,
        vec![Some(phonemes(&["p", "t", "k"])), Some(true.into())]
    );
}

#[test]
fn test_history_is_kept() {
    let result = ptk_query().evaluate(&three_languages()).unwrap();
    assert_eq!(result.language_set_history().len(), 2);
    assert_eq!(result.result_set_history().len(), 5);
    assert!(result.result_set_history()[0].is_languages());
}

#[test]
fn test_missing_field_everywhere_fails_quorum() {
    let err = Query::new()
        .apply(Get::new("missing_field"))
        .evaluate(&three_languages())
        .unwrap_err();
    assert!(err.is_quorum());
    match err {
        QueryError::Quorum(quorum) => {
            assert_eq!(quorum.field, "missing_field");
            assert_eq!(quorum.present, 0);
            assert_eq!(quorum.total, 3);
        }
        other => panic!("expected a quorum error, got {other:?}"),
    }
}

#[test]
fn test_partial_data_passes_quorum() {
    let result = Query::new()
        .apply(Get::new("tone"))
        .evaluate(&partial_tone())
        .unwrap();
    assert_eq!(result.language_set().names(), vec!["Lang0", "Lang1"]);
    assert_eq!(result.result_set().len(), 2);
    assert_eq!(
        result.no_data(),
        &[MissingData {
            step: 0,
            field: "tone".to_string(),
            language: "Lang2".to_string(),
        }]
    );
}

#[test]
fn test_quorum_boundaries() {
    let query = Query::new().apply(Get::new("tone"));
    assert!(query.evaluate(&with_present(4, 2)).is_ok());
    assert!(query.evaluate(&with_present(4, 1)).unwrap_err().is_quorum());

    let strict = Query::new().apply(Get::new("tone")).with_quorum(0.75);
    assert!(strict.evaluate(&with_present(4, 2)).unwrap_err().is_quorum());
    assert!(strict.evaluate(&with_present(4, 3)).is_ok());
}

#[test]
fn test_exclusion_keeps_alignment() {
    let result = Query::new()
        .apply(Get::new("tone"))
        .apply(Bool)
        .filter()
        .evaluate(&partial_tone())
        .unwrap();
    assert_eq!(result.language_set().names(), vec!["Lang0"]);
    assert_eq!(result.rationale(), &[Some(true.into())]);
}

#[test]
fn test_extract_context_before_transformation() {
    let err = Query::new()
        .extract_context()
        .evaluate(&three_languages())
        .unwrap_err();
    assert!(matches!(err, QueryError::ContextFromLanguages { step: 0 }));
}

#[test]
fn test_filter_requires_booleans() {
    let err = Query::new()
        .apply(Get::new("consonants"))
        .apply(Length)
        .filter()
        .evaluate(&three_languages())
        .unwrap_err();
    match err {
        QueryError::NonBooleanFilter {
            step,
            language,
            found,
        } => {
            assert_eq!(step, 2);
            assert_eq!(language, "English");
            assert_eq!(found, "int");
        }
        other => panic!("expected a filter error, got {other:?}"),
    }

    let err = Query::new().filter().evaluate(&three_languages()).unwrap_err();
    assert!(matches!(err, QueryError::NonBooleanFilter { step: 0, .. }));
}

#[test]
fn test_transformation_error_aborts() {
    let err = Query::new()
        .apply(Get::new("country"))
        .apply(Length)
        .apply(Intersection::new(["x"]))
        .evaluate(&three_languages())
        .unwrap_err();
    match &err {
        QueryError::Transformation {
            step,
            transformation,
            language,
            source,
        } => {
            assert_eq!(*step, 2);
            assert_eq!(transformation, "Intersection");
            assert_eq!(language, "English");
            assert!(matches!(source, TransformError::UnexpectedInput { .. }));
        }
        other => panic!("expected a transformation error, got {other:?}"),
    }
    assert!(std::error::Error::source(&err).is_some());
    assert!(!err.is_quorum());
}

#[test]
fn test_display() {
    assert_eq!(
        ptk_query().to_string(),
        "Query[Get -> Intersection -> ExtractContext -> Geq -> FilterLanguageSet]"
    );
    let result = ptk_query().evaluate(&three_languages()).unwrap();
    assert_eq!(
        result.to_string(),
        "<2 results: [true, true], contexts=[[[p, t, k], [k], [p, t]]]>"
    );
}

#[test]
fn test_property_list_query() {
    let query = PropertyQuery::list("consonants", "at least", 2, ["p", "t", "k"]).unwrap();
    let matches = query
        .run(&three_languages(), &QuorumPolicy::default())
        .unwrap();
    assert_eq!(matches.languages().names(), vec!["English", "Spanish"]);
    let causes: Vec<&Cause> = matches.iter().map(|m| &m.cause).collect();
    assert_eq!(
        causes,
        vec![
            &Cause::Elements(vec![
                Primitive::text("p"),
                Primitive::text("t"),
                Primitive::text("k")
            ]),
            &Cause::Elements(vec![Primitive::text("p"), Primitive::text("t")]),
        ]
    );
    assert_eq!(
        matches.cause_frequencies(),
        vec![
            (Primitive::text("p"), 2),
            (Primitive::text("t"), 2),
            (Primitive::text("k"), 1)
        ]
    );
    assert_eq!(matches.describe(), "have at least 2 of p, t, k");
    assert_eq!(matches.to_string(), "2 languages have at least 2 of p, t, k");
}

#[test]
fn test_property_list_all_alias() {
    let query = PropertyQuery::list("consonants", "all", 0, ["p", "t"]).unwrap();
    assert!(matches!(
        query,
        PropertyQuery::List {
            mode: lingdb_core::Mode::Geq,
            k: 2,
            ..
        }
    ));
    let matches = query
        .run(&three_languages(), &QuorumPolicy::default())
        .unwrap();
    assert_eq!(matches.languages().names(), vec!["English", "Spanish"]);
}

#[test]
fn test_property_list_passing_with_empty_intersection() {
    // No inventory in the corpus has a glottal stop.
    let query = PropertyQuery::list("consonants", "less than", 1, ["ʔ"]).unwrap();
    let matches = query
        .run(&three_languages(), &QuorumPolicy::default())
        .unwrap();
    assert_eq!(matches.len(), 3);
    assert!(matches.iter().all(|m| m.cause == Cause::Elements(vec![])));

    let query = PropertyQuery::list("consonants", "less than", 1, ["x"]).unwrap();
    let matches = query
        .run(&three_languages(), &QuorumPolicy::default())
        .unwrap();
    assert_eq!(matches.languages().names(), vec!["English", "French"]);
}

#[test]
fn test_property_scalar_queries() {
    let corpus = three_languages();
    let quorum = QuorumPolicy::default();

    let num = PropertyQuery::num("num consonants", "more than", 8).unwrap();
    let matches = num.run(&corpus, &quorum).unwrap();
    assert_eq!(matches.languages().names(), vec!["French", "Spanish"]);
    assert_eq!(num.describe(), "have a num consonants of more than 8");

    let text = PropertyQuery::text("country", "exactly", "France").unwrap();
    let matches = text.run(&corpus, &quorum).unwrap();
    assert_eq!(matches.languages().names(), vec!["French"]);
    assert!(matches.cause_frequencies().is_empty());

    let flag = PropertyQuery::flag("tone", false);
    let matches = flag.run(&corpus, &quorum).unwrap();
    assert_eq!(matches.len(), 3);
    assert!(matches.iter().all(|m| m.cause == Cause::None));
}

#[test]
fn test_property_construction_errors() {
    assert!(matches!(
        PropertyQuery::text("country", "more than", "France"),
        Err(QueryError::Construction(_))
    ));
    assert!(matches!(
        PropertyQuery::list("consonants", "roughly", 1, ["p"]),
        Err(QueryError::Construction(_))
    ));
    assert!(PropertyQuery::num("num consonants", "all", 1).is_err());
}

#[test]
fn test_property_quorum() {
    let flag = PropertyQuery::flag("tone", true);
    let err = flag
        .run(&with_present(4, 1), &QuorumPolicy::default())
        .unwrap_err();
    assert!(err.is_quorum());

    let matches = flag
        .run(&partial_tone(), &QuorumPolicy::default())
        .unwrap();
    assert_eq!(matches.languages().names(), vec!["Lang0"]);
    assert_eq!(matches.no_data().len(), 1);
    assert_eq!(matches.no_data()[0].name(), "Lang2");
}

#[test]
fn test_property_always_never() {
    let corpus = three_languages();
    let quorum = QuorumPolicy::default();
    assert_eq!(PropertyQuery::Always.run(&corpus, &quorum).unwrap().len(), 3);
    assert!(PropertyQuery::Never.run(&corpus, &quorum).unwrap().is_empty());
}

fn arb_language_set() -> impl Strategy<Value = LanguageSet> {
    prop::collection::vec(prop::option::of(any::<bool>()), 0..8).prop_map(|tones| {
        let languages = tones.into_iter().enumerate().map(|(i, tone)| {
            let builder = Language::builder(format!("L{i}"), "Student", format!("n{i}"));
            let builder = match tone {
                Some(tone) => builder.datapoint("tone", tone),
                None => builder,
            };
            builder.build().unwrap()
        });
        LanguageSet::new(languages).unwrap()
    })
}

proptest! {
    #[test]
    fn prop_empty_query_is_identity(set in arb_language_set()) {
        let result = Query::new().evaluate(&set).unwrap();
        prop_assert_eq!(result.language_set(), &set);
        prop_assert_eq!(result.result_set(), &ResultSet::Languages(set.clone()));
    }
}
