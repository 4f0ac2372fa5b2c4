//! Corpora where only some languages have a given property.

use lingdb_core::{Language, LanguageSet};

/// Builds `total` languages named `Lang0`, `Lang1`, ..., where only the first
/// `present` have a `tone` datapoint.
pub fn with_present(total: usize, present: usize) -> LanguageSet {
    let languages = (0..total).map(|i| {
        let builder = Language::builder(format!("Lang{i}"), "Test Student", format!("lang{i:02}"));
        let builder = if i < present {
            builder.datapoint("tone", i % 2 == 0)
        } else {
            builder
        };
        builder
            .build()
            .expect("fixture languages have identity fields")
    });
    LanguageSet::new(languages).expect("fixture identities are unique")
}

/// Three languages of which exactly two record `tone`.
pub fn partial_tone() -> LanguageSet {
    with_present(3, 2)
}
