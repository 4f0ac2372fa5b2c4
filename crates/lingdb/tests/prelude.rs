//! The facade prelude against the shared corpus.

use lingdb::prelude::*;
use lingdb_test::three_languages;

#[test]
fn test_consonant_query_through_prelude() {
    let result = Query::new()
        .apply(Get::new("consonants"))
        .apply(Intersection::new(["p", "t", "k"]))
        .extract_context()
        .apply(Comparison::at_least(2i64))
        .filter()
        .evaluate(&three_languages())
        .unwrap();

    assert_eq!(result.language_set().names(), vec!["English", "Spanish"]);

    let rows = result.rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].language, "English");
    assert_eq!(
        rows[0].contexts,
        vec![Some(DatapointValue::collection(["p", "t", "k"]))]
    );
    assert_eq!(
        rows[1].contexts,
        vec![Some(DatapointValue::collection(["p", "t"]))]
    );
}

#[test]
fn test_property_query_through_prelude() {
    let matches = PropertyQuery::num("num consonants", "more than", 8)
        .unwrap()
        .run(&three_languages(), &QuorumPolicy::default())
        .unwrap();
    assert_eq!(matches.languages().names(), vec!["French", "Spanish"]);
}
