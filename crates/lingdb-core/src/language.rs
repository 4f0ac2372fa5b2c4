//! A single immutable language record.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::warn;

use crate::error::{LingDbError, Result};
use crate::schema::DatapointKey;
use crate::value::{DatapointValue, Primitive};

#[derive(Debug)]
struct LanguageData {
    name: Arc<str>,
    student: Arc<str>,
    netid: Arc<str>,
    known: BTreeMap<DatapointKey, DatapointValue>,
    extra: BTreeMap<String, DatapointValue>,
}

/// A Language consists of a collection of datapoints.
///
/// Equality and hashing use only the identity fields (name, student, netid).
/// Cloning is cheap; the record itself is shared and never mutated.
#[derive(Clone)]
pub struct Language {
    data: Arc<LanguageData>,
}

impl Language {
    /// Starts building a language with the three identity fields.
    pub fn builder(
        name: impl Into<String>,
        student: impl Into<String>,
        netid: impl Into<String>,
    ) -> LanguageBuilder {
        LanguageBuilder::new()
            .datapoint(DatapointKey::Name.as_str(), name.into())
            .datapoint(DatapointKey::Student.as_str(), student.into())
            .datapoint(DatapointKey::Netid.as_str(), netid.into())
    }

    /// Builds a language from `(property name, value)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`LingDbError::MissingIdentity`] if name, student or netid is
    /// absent, empty, or not text.
    pub fn from_datapoints<I, K>(datapoints: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, DatapointValue)>,
        K: Into<String>,
    {
        datapoints
            .into_iter()
            .fold(LanguageBuilder::new(), |b, (k, v)| b.datapoint(k, v))
            .build()
    }

    /// Builds a language from one object of a normalized JSON array.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            LingDbError::MalformedRecord(format!("expected a JSON object, found {value}"))
        })?;

        let mut builder = LanguageBuilder::new();
        for (key, raw) in object {
            let parsed = DatapointValue::from_json(raw).map_err(|err| {
                LingDbError::MalformedRecord(format!("property '{key}': {err}"))
            })?;
            if let Some(value) = parsed {
                builder = builder.datapoint(key.as_str(), value);
            }
        }
        builder.build()
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn student(&self) -> &str {
        &self.data.student
    }

    pub fn netid(&self) -> &str {
        &self.data.netid
    }

    /// Gets the named datapoint value of this language.
    ///
    /// Known properties resolve through [`DatapointKey::parse`]; anything else
    /// must match an extra property name exactly.
    pub fn get(&self, field: &str) -> Option<&DatapointValue> {
        match DatapointKey::parse(field) {
            Some(key) => self.data.known.get(&key),
            None => self.data.extra.get(field),
        }
    }

    /// Gets a known datapoint by key.
    pub fn get_key(&self, key: DatapointKey) -> Option<&DatapointValue> {
        self.data.known.get(&key)
    }

    /// Returns true if this language has a value for the named property.
    pub fn has(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Returns the properties outside the known schema.
    pub fn extra(&self) -> &BTreeMap<String, DatapointValue> {
        &self.data.extra
    }

    /// Iterates over every datapoint: known properties in schema order, then extras.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DatapointValue)> {
        self.data
            .known
            .iter()
            .map(|(k, v)| (k.as_str(), v))
            .chain(self.data.extra.iter().map(|(k, v)| (k.as_str(), v)))
    }

    /// Returns the number of datapoints in this language.
    pub fn len(&self) -> usize {
        self.data.known.len() + self.data.extra.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn identity(&self) -> (&str, &str, &str) {
        (self.name(), self.student(), self.netid())
    }
}

impl PartialEq for Language {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Language {}

impl Hash for Language {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Language {}>", self.name())
    }
}

impl fmt::Debug for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Language")
            .field("name", &self.name())
            .field("student", &self.student())
            .field("netid", &self.netid())
            .field("datapoints", &self.len())
            .finish()
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Accumulates datapoints and validates them into a [`Language`].
#[derive(Debug, Default)]
pub struct LanguageBuilder {
    known: BTreeMap<DatapointKey, DatapointValue>,
    extra: BTreeMap<String, DatapointValue>,
}

impl LanguageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a datapoint. A later value for the same property replaces an earlier one.
    pub fn datapoint(mut self, name: impl Into<String>, value: impl Into<DatapointValue>) -> Self {
        let name = name.into();
        let value = value.into();
        match DatapointKey::parse(&name) {
            Some(key) => {
                self.known.insert(key, value);
            }
            None => {
                self.extra.insert(name, value);
            }
        }
        self
    }

    /// Validates identity fields and produces the language.
    pub fn build(mut self) -> Result<Language> {
        let name = self.identity_field(DatapointKey::Name)?;
        let student = self.identity_field(DatapointKey::Student)?;
        let netid = self.identity_field(DatapointKey::Netid)?;

        for (key, value) in &self.known {
            if value.kind() != key.kind() {
                warn!(
                    event = "unexpected_datapoint_kind",
                    language = %name,
                    field = key.as_str(),
                    expected = %key.kind(),
                    found = %value.kind(),
                );
            }
        }

        self.derive_stress();

        Ok(Language {
            data: Arc::new(LanguageData {
                name,
                student,
                netid,
                known: self.known,
                extra: self.extra,
            }),
        })
    }

    fn identity_field(&self, key: DatapointKey) -> Result<Arc<str>> {
        match self.known.get(&key).and_then(DatapointValue::as_text) {
            Some(text) if !text.is_empty() => Ok(Arc::from(text)),
            _ => Err(LingDbError::MissingIdentity {
                field: key.as_str(),
            }),
        }
    }

    // Older surveys only recorded `stress`; newer ones split it in two and
    // leave `stress` to mean "either kind".
    fn derive_stress(&mut self) {
        if self.known.contains_key(&DatapointKey::Stress) {
            return;
        }
        let predictable = self
            .known
            .get(&DatapointKey::PredictableStress)
            .and_then(DatapointValue::as_bool);
        let unpredictable = self
            .known
            .get(&DatapointKey::UnpredictableStress)
            .and_then(DatapointValue::as_bool);
        if predictable.is_none() && unpredictable.is_none() {
            return;
        }
        let any = predictable.unwrap_or(false) || unpredictable.unwrap_or(false);
        self.known.insert(
            DatapointKey::Stress,
            DatapointValue::Primitive(Primitive::Bool(any)),
        );
    }
}
