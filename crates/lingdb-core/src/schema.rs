//! The known survey properties and their expected shapes.
//!
//! Properties outside this list are still accepted; a Language keeps them in
//! a separate map so that new survey questions load without code changes.

use std::fmt;

use crate::value::FieldKind;

macro_rules! datapoint_keys {
    ($($variant:ident => $name:literal : $kind:ident),* $(,)?) => {
        /// The name of a single known datapoint in a language.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum DatapointKey {
            $($variant,)*
        }

        impl DatapointKey {
            /// Every known key, in schema order.
            pub const ALL: &'static [DatapointKey] = &[$(DatapointKey::$variant,)*];

            /// Returns the canonical name of this key.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(DatapointKey::$variant => $name,)*
                }
            }

            /// Returns the expected shape of values stored under this key.
            pub fn kind(self) -> FieldKind {
                match self {
                    $(DatapointKey::$variant => FieldKind::$kind,)*
                }
            }
        }
    };
}

datapoint_keys! {
    Name => "name": Text,
    Student => "student": Text,
    Netid => "netid": Text,

    Country => "country": Text,
    LanguageFamily => "language_family": Text,
    EndangermentLevel => "endangerment_level": Text,

    NumConsonants => "num_consonants": Int,
    NumVowels => "num_vowels": Int,
    NumPhonemes => "num_phonemes": Int,

    Consonants => "consonants": List,
    ConsonantTypes => "consonant_types": List,
    Vowels => "vowels": List,
    VowelTypes => "vowel_types": List,

    // Deprecated since num_consonant_places / num_consonant_manners.
    Has3PlusPlaces => "3+_consonant_places": Bool,
    Has2PlusManners => "2+_consonant_manners": Bool,

    NumConsonantPlaces => "num_consonant_places": Int,
    NumConsonantManners => "num_consonant_manners": Int,

    ComplexConsonants => "complex_consonants": Bool,
    Tone => "tone": Bool,

    // Derived when absent; see Language construction.
    Stress => "stress": Bool,
    PredictableStress => "predictable_stress": Bool,
    UnpredictableStress => "unpredictable_stress": Bool,

    Syllables => "syllables": List,

    Recommend => "recommend": Text,

    MorphologicalType => "morphological_type": List,
    WordFormation => "word_formation": List,
    WordFormationFrequency => "word_formation_frequency": List,
    AffixalWordFormationFrequency => "affixal_word_formation_frequency": Text,
    NonaffixalWordFormationFrequency => "nonaffixal_word_formation_frequency": Text,

    FunctionalMorphology => "functional_morphology": List,
    WordOrder => "word_order": List,
    Headedness => "headedness": List,

    Agreement => "agreement": Text,
    Case => "case": Text,
}

impl DatapointKey {
    /// Resolves a property name to a known key.
    ///
    /// Matching ignores case and treats spaces and hyphens like underscores,
    /// so `"num consonants"` and `"Consonants"` both resolve.
    pub fn parse(name: &str) -> Option<Self> {
        let normalized: String = name
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == normalized)
    }

    /// Returns true for the three fields that identify a Language.
    pub fn is_identity(self) -> bool {
        matches!(
            self,
            DatapointKey::Name | DatapointKey::Student | DatapointKey::Netid
        )
    }
}

impl fmt::Display for DatapointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes() {
        assert_eq!(
            DatapointKey::parse("num consonants"),
            Some(DatapointKey::NumConsonants)
        );
        assert_eq!(
            DatapointKey::parse("Consonants"),
            Some(DatapointKey::Consonants)
        );
        assert_eq!(
            DatapointKey::parse("3+ consonant places"),
            Some(DatapointKey::Has3PlusPlaces)
        );
        assert_eq!(DatapointKey::parse("favourite colour"), None);
    }

    #[test]
    fn test_round_trip_names() {
        for key in DatapointKey::ALL {
            assert_eq!(DatapointKey::parse(key.as_str()), Some(*key));
        }
    }

    #[test]
    fn test_kinds() {
        assert_eq!(DatapointKey::Consonants.kind(), FieldKind::List);
        assert_eq!(DatapointKey::Tone.kind(), FieldKind::Bool);
        assert!(DatapointKey::Netid.is_identity());
        assert!(!DatapointKey::Country.is_identity());
    }
}
