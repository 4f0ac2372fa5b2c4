//! A small, fully populated corpus.

use lingdb_core::{DatapointValue, Language, LanguageSet};

/// Builds a language with the given consonant inventory and test identity fields.
pub fn language(name: &str, consonants: &[&str]) -> Language {
    Language::builder(name, "Test Student", format!("{}01", name.to_lowercase()))
        .datapoint("consonants", DatapointValue::collection(consonants.iter().copied()))
        .datapoint("num consonants", consonants.len() as i64)
        .build()
        .expect("fixture languages have identity fields")
}

/// Returns the JSON form of [`three_languages`], as loaded from disk.
pub fn three_languages_json() -> serde_json::Value {
    serde_json::json!([
        {
            "name": "English",
            "student": "Test Student",
            "netid": "english01",
            "country": "United Kingdom",
            "language_family": "Indo-European",
            "consonants": ["p", "t", "k", "b", "d", "g", "m", "n"],
            "num consonants": 8,
            "predictable_stress": false,
            "unpredictable_stress": true,
            "tone": false,
            "word_order": ["SVO"]
        },
        {
            "name": "French",
            "student": "Test Student",
            "netid": "french01",
            "country": "France",
            "language_family": "Indo-European",
            "consonants": ["k", "b", "d", "g", "m", "n", "l", "r", "s"],
            "num consonants": 9,
            "predictable_stress": true,
            "unpredictable_stress": false,
            "tone": false,
            "word_order": ["SVO"]
        },
        {
            "name": "Spanish",
            "student": "Test Student",
            "netid": "spanish01",
            "country": "Spain",
            "language_family": "Indo-European",
            "consonants": ["p", "t", "m", "n", "j", "v", "z", "x", "w", "q"],
            "num consonants": 10,
            "stress": true,
            "tone": false,
            "word_order": ["SVO", "VSO"]
        }
    ])
}

/// The English/French/Spanish corpus.
///
/// `Get(consonants) → Intersection([p, t, k])` yields `[p, t, k]`, `[k]` and
/// `[p, t]` respectively.
pub fn three_languages() -> LanguageSet {
    LanguageSet::from_json(&three_languages_json()).expect("fixture corpus is well formed")
}
