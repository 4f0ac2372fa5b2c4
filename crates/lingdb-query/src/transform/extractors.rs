//! Field access on a Language.

use std::str::FromStr;

use lingdb_core::{DatapointKey, DatapointValue, Language};

use super::{Extractor, TransformError};

/// Gets a named field from a language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Get {
    field: String,
}

impl Get {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Gets a known schema field.
    pub fn key(key: DatapointKey) -> Self {
        Self::new(key.as_str())
    }
}

impl Extractor for Get {
    fn name(&self) -> &str {
        "Get"
    }

    fn field(&self) -> &str {
        &self.field
    }

    fn extract(&self, language: &Language) -> Result<DatapointValue, TransformError> {
        language
            .get(&self.field)
            .cloned()
            .ok_or_else(|| TransformError::MissingDatapoint {
                language: language.name().to_string(),
                field: self.field.clone(),
            })
    }
}

/// Extractors that take no argument, by registry name.
pub const NAMED_EXTRACTORS: &[(&str, DatapointKey)] = &[
    ("GetName", DatapointKey::Name),
    ("GetCountry", DatapointKey::Country),
    ("GetLanguageFamily", DatapointKey::LanguageFamily),
    ("GetEndangerment", DatapointKey::EndangermentLevel),
    ("GetNumConsonants", DatapointKey::NumConsonants),
    ("GetNumVowels", DatapointKey::NumVowels),
    ("GetNumPhonemes", DatapointKey::NumPhonemes),
    ("GetConsonants", DatapointKey::Consonants),
    ("GetConsonantTypes", DatapointKey::ConsonantTypes),
    ("GetVowels", DatapointKey::Vowels),
    ("GetVowelTypes", DatapointKey::VowelTypes),
    ("GetNumConsonantPlaces", DatapointKey::NumConsonantPlaces),
    ("GetNumConsonantManners", DatapointKey::NumConsonantManners),
    ("HasComplexConsonants", DatapointKey::ComplexConsonants),
    ("HasTone", DatapointKey::Tone),
    ("HasAnyStress", DatapointKey::Stress),
    ("HasPredictableStress", DatapointKey::PredictableStress),
    ("HasUnpredictableStress", DatapointKey::UnpredictableStress),
    ("GetSyllables", DatapointKey::Syllables),
    ("GetRecommend", DatapointKey::Recommend),
    ("GetMorphologicalType", DatapointKey::MorphologicalType),
    ("GetWordFormation", DatapointKey::WordFormation),
    ("GetFunctionalMorphology", DatapointKey::FunctionalMorphology),
    ("GetWordOrder", DatapointKey::WordOrder),
    ("GetHeadedness", DatapointKey::Headedness),
    ("GetAgreement", DatapointKey::Agreement),
    ("GetCase", DatapointKey::Case),
];

/// Looks up an argument-free extractor by registry name.
pub fn named_extractor(name: &str) -> Option<Get> {
    NAMED_EXTRACTORS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, key)| Get::key(*key))
}

// An extractor that picks one of several keys by a string argument. The
// empty argument selects the first (default) variant.
macro_rules! multiplexing_extractor {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:ident {
            $($variant:ident => $arg:literal : $key:ident),+ $(,)?
        }
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $kind {
            $($variant,)+
        }

        impl $kind {
            pub const ALL: &'static [$kind] = &[$($kind::$variant,)+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($kind::$variant => $arg,)+
                }
            }

            pub fn key(self) -> DatapointKey {
                match self {
                    $($kind::$variant => DatapointKey::$key,)+
                }
            }
        }

        impl FromStr for $kind {
            type Err = TransformError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                if s.is_empty() {
                    return Ok(Self::ALL[0]);
                }
                Self::ALL
                    .iter()
                    .copied()
                    .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| {
                        let options: Vec<&str> = Self::ALL.iter().map(|k| k.as_str()).collect();
                        TransformError::invalid(
                            stringify!($name),
                            format!("'{s}' is not one of {}", options.join(", ")),
                        )
                    })
            }
        }

        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            kind: $kind,
            get: Get,
        }

        impl $name {
            pub fn new(kind: $kind) -> Self {
                Self {
                    kind,
                    get: Get::key(kind.key()),
                }
            }

            /// Selects the variant named by `arg`.
            pub fn parse(arg: &str) -> Result<Self, TransformError> {
                arg.parse().map(Self::new)
            }

            pub fn selected(&self) -> $kind {
                self.kind
            }
        }

        impl Extractor for $name {
            fn name(&self) -> &str {
                stringify!($name)
            }

            fn field(&self) -> &str {
                Extractor::field(&self.get)
            }

            fn extract(&self, language: &Language) -> Result<DatapointValue, TransformError> {
                self.get.extract(language)
            }
        }

        impl_extractor!($name);
    };
}

multiplexing_extractor! {
    /// Extracts one kind of stress (`any`, `predictable`, `unpredictable`).
    HasStress, StressKind {
        Any => "any": Stress,
        Predictable => "predictable": PredictableStress,
        Unpredictable => "unpredictable": UnpredictableStress,
    }
}

multiplexing_extractor! {
    /// Extracts one kind of word formation frequency (`any`, `affixal`, `nonaffixal`).
    HasWordFormationFrequency, WordFormationFrequencyKind {
        Any => "any": WordFormationFrequency,
        Affixal => "affixal": AffixalWordFormationFrequency,
        Nonaffixal => "nonaffixal": NonaffixalWordFormationFrequency,
    }
}

impl_extractor!(Get);
