//! Immutable, deduplicated collections of languages.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

use serde::ser::{Serialize, SerializeSeq, Serializer};
use tracing::{debug, warn};

use crate::error::{LingDbError, Result};
use crate::language::Language;

/// A set of uniquely identified languages.
///
/// Iteration follows load order. Languages sharing a display name are
/// indexed under `"<name> A"`, `"<name> B"`, ... in that order.
#[derive(Clone, Default)]
pub struct LanguageSet {
    languages: Vec<Language>,
    index: HashMap<String, usize>,
}

impl LanguageSet {
    /// Builds a set from languages in load order.
    ///
    /// # Errors
    ///
    /// Returns [`LingDbError::DuplicateLanguage`] if two languages share an identity.
    pub fn new(languages: impl IntoIterator<Item = Language>) -> Result<Self> {
        let languages: Vec<Language> = languages.into_iter().collect();

        let mut seen = HashSet::with_capacity(languages.len());
        for lang in &languages {
            if !seen.insert(lang) {
                return Err(LingDbError::DuplicateLanguage(format!(
                    "{} ({}, {})",
                    lang.name(),
                    lang.student(),
                    lang.netid()
                )));
            }
        }

        Ok(Self::from_unique(languages))
    }

    /// Builds a set from languages already known to be unique.
    ///
    /// Every language ends up indexed under exactly one key. An alias that
    /// would shadow another language's name skips to the next letter.
    fn from_unique(languages: Vec<Language>) -> Self {
        let mut groups: Vec<(&str, Vec<usize>)> = Vec::new();
        for (i, lang) in languages.iter().enumerate() {
            match groups.iter_mut().find(|(name, _)| *name == lang.name()) {
                Some((_, positions)) => positions.push(i),
                None => groups.push((lang.name(), vec![i])),
            }
        }

        let mut index = HashMap::with_capacity(languages.len());
        for (name, positions) in &groups {
            if let [pos] = positions.as_slice() {
                index.insert(name.to_string(), *pos);
            }
        }

        for (name, positions) in groups.iter().filter(|(_, p)| p.len() > 1) {
            warn!(
                event = "duplicate_language_name",
                language = %name,
                count = positions.len(),
            );
            let mut letter = 0;
            for &pos in positions {
                let alias = loop {
                    let candidate = format!("{name} {}", alias_suffix(letter));
                    letter += 1;
                    if !index.contains_key(&candidate) {
                        break candidate;
                    }
                };
                index.insert(alias, pos);
            }
        }

        Self { languages, index }
    }

    /// Parses a normalized JSON array of datapoint mappings.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_json(&value)
    }

    /// Parses an already-decoded JSON array of datapoint mappings.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let records = value.as_array().ok_or_else(|| {
            LingDbError::MalformedRecord("a language set must be a JSON array".to_string())
        })?;
        let languages = records
            .iter()
            .map(Language::from_json)
            .collect::<Result<Vec<_>>>()?;
        Self::new(languages)
    }

    /// Loads a normalized JSON array from disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let set = Self::from_json_str(&contents)?;
        debug!(
            event = "language_set_loaded",
            path = %path.display(),
            languages = set.len(),
        );
        Ok(set)
    }

    /// Gets a language by display name, or by alias for duplicated names.
    pub fn get(&self, name: &str) -> Option<&Language> {
        self.index.get(name).map(|&i| &self.languages[i])
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Language> {
        self.languages.iter()
    }

    pub fn as_slice(&self) -> &[Language] {
        &self.languages
    }

    pub fn contains(&self, language: &Language) -> bool {
        self.languages.contains(language)
    }

    /// Returns the names each language is indexed under, in load order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<(usize, &str)> = self
            .index
            .iter()
            .map(|(name, &i)| (i, name.as_str()))
            .collect();
        names.sort_unstable_by_key(|(i, _)| *i);
        names.into_iter().map(|(_, name)| name).collect()
    }

    /// Returns a new set with only the languages for which `keep` is true.
    pub fn subset(&self, mut keep: impl FnMut(&Language) -> bool) -> Self {
        let kept = self.languages.iter().filter(|l| keep(l)).cloned().collect();
        Self::from_unique(kept)
    }

    /// Returns a new set with the languages at the given positions, in order.
    ///
    /// Positions out of range are ignored.
    pub fn select(&self, positions: impl IntoIterator<Item = usize>) -> Self {
        let kept = positions
            .into_iter()
            .filter_map(|i| self.languages.get(i).cloned())
            .collect();
        Self::from_unique(kept)
    }
}

fn alias_suffix(n: usize) -> String {
    // A..Z, then AA, AB, ...
    let mut n = n;
    let mut out = Vec::new();
    loop {
        out.push(b'A' + (n % 26) as u8);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

impl PartialEq for LanguageSet {
    fn eq(&self, other: &Self) -> bool {
        self.languages == other.languages
    }
}

impl Eq for LanguageSet {}

impl<'a> IntoIterator for &'a LanguageSet {
    type Item = &'a Language;
    type IntoIter = std::slice::Iter<'a, Language>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for LanguageSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.languages.iter().map(Language::name))
            .finish()
    }
}

impl fmt::Display for LanguageSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<LanguageSet of {} languages>", self.len())
    }
}

impl Serialize for LanguageSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for lang in &self.languages {
            seq.serialize_element(lang)?;
        }
        seq.end()
    }
}
