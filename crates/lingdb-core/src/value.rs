//! Datapoint values: primitives and ordered collections of primitives.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{LingDbError, Result};

/// A single primitive datapoint value.
///
/// Floats are equal and hash alike only when bit-identical; use
/// [`values_equal`](crate::values_equal) for numeric comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Primitive {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(Arc<str>),
}

impl PartialEq for Primitive {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Primitive::Bool(a), Primitive::Bool(b)) => a == b,
            (Primitive::Int(a), Primitive::Int(b)) => a == b,
            (Primitive::Float(a), Primitive::Float(b)) => a.to_bits() == b.to_bits(),
            (Primitive::Text(a), Primitive::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Primitive {}

impl Hash for Primitive {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Primitive::Bool(v) => v.hash(state),
            Primitive::Int(v) => v.hash(state),
            Primitive::Float(v) => v.to_bits().hash(state),
            Primitive::Text(v) => v.hash(state),
        }
    }
}

impl Primitive {
    /// Creates a text primitive.
    pub fn text(value: impl Into<Arc<str>>) -> Self {
        Primitive::Text(value.into())
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Primitive::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Primitive::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Attempts to extract a float; integers widen.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Primitive::Float(v) => Some(*v),
            Primitive::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Primitive::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the short name of this primitive's type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Primitive::Bool(_) => "bool",
            Primitive::Int(_) => "int",
            Primitive::Float(_) => "float",
            Primitive::Text(_) => "str",
        }
    }

    /// Interprets a JSON scalar as a primitive.
    ///
    /// Returns `Ok(None)` for `null`.
    pub fn from_json(value: &serde_json::Value) -> Result<Option<Self>> {
        match value {
            serde_json::Value::Null => Ok(None),
            serde_json::Value::Bool(b) => Ok(Some(Primitive::Bool(*b))),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Some(Primitive::Int(i)))
                } else if let Some(f) = n.as_f64() {
                    Ok(Some(Primitive::Float(f)))
                } else {
                    Err(LingDbError::MalformedRecord(format!(
                        "number {n} is out of range"
                    )))
                }
            }
            serde_json::Value::String(s) => Ok(Some(Primitive::text(s.as_str()))),
            other => Err(LingDbError::MalformedRecord(format!(
                "expected a primitive value, found {other}"
            ))),
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Bool(v) => write!(f, "{v}"),
            Primitive::Int(v) => write!(f, "{v}"),
            Primitive::Float(v) => write!(f, "{v}"),
            Primitive::Text(v) => f.write_str(v),
        }
    }
}

impl From<bool> for Primitive {
    fn from(v: bool) -> Self {
        Primitive::Bool(v)
    }
}

impl From<i64> for Primitive {
    fn from(v: i64) -> Self {
        Primitive::Int(v)
    }
}

impl From<f64> for Primitive {
    fn from(v: f64) -> Self {
        Primitive::Float(v)
    }
}

impl From<&str> for Primitive {
    fn from(v: &str) -> Self {
        Primitive::text(v)
    }
}

impl From<String> for Primitive {
    fn from(v: String) -> Self {
        Primitive::text(v)
    }
}

/// The expected shape of a datapoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Text,
    Int,
    Float,
    Bool,
    List,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Text => "text",
            FieldKind::Int => "int",
            FieldKind::Float => "float",
            FieldKind::Bool => "bool",
            FieldKind::List => "list",
        };
        f.write_str(name)
    }
}

/// A single named property value: a primitive or an ordered collection of primitives.
///
/// This is also the only valid shape of query context, so every value is
/// serializable to plain JSON.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DatapointValue {
    Primitive(Primitive),
    Collection(Vec<Primitive>),
}

/// A value captured mid-query to explain or graph a result.
///
/// Never a whole Language.
pub type Context = DatapointValue;

impl DatapointValue {
    /// Builds a collection from anything convertible to primitives.
    pub fn collection<I, P>(items: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Primitive>,
    {
        DatapointValue::Collection(items.into_iter().map(Into::into).collect())
    }

    pub fn as_primitive(&self) -> Option<&Primitive> {
        match self {
            DatapointValue::Primitive(p) => Some(p),
            DatapointValue::Collection(_) => None,
        }
    }

    pub fn as_collection(&self) -> Option<&[Primitive]> {
        match self {
            DatapointValue::Collection(items) => Some(items),
            DatapointValue::Primitive(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_primitive().and_then(Primitive::as_bool)
    }

    pub fn as_int(&self) -> Option<i64> {
        self.as_primitive().and_then(Primitive::as_int)
    }

    pub fn as_text(&self) -> Option<&str> {
        self.as_primitive().and_then(Primitive::as_text)
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, DatapointValue::Collection(_))
    }

    /// Returns the kind of this value.
    pub fn kind(&self) -> FieldKind {
        match self {
            DatapointValue::Primitive(Primitive::Bool(_)) => FieldKind::Bool,
            DatapointValue::Primitive(Primitive::Int(_)) => FieldKind::Int,
            DatapointValue::Primitive(Primitive::Float(_)) => FieldKind::Float,
            DatapointValue::Primitive(Primitive::Text(_)) => FieldKind::Text,
            DatapointValue::Collection(_) => FieldKind::List,
        }
    }

    /// Returns the short name of this value's type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            DatapointValue::Primitive(p) => p.type_name(),
            DatapointValue::Collection(_) => "list",
        }
    }

    /// Checks if this collection contains the given primitive.
    pub fn contains(&self, needle: &Primitive) -> bool {
        match self {
            DatapointValue::Collection(items) => items.contains(needle),
            DatapointValue::Primitive(_) => false,
        }
    }

    /// Interprets a JSON value as a datapoint.
    ///
    /// `null` yields `Ok(None)`; null entries inside an array are skipped.
    pub fn from_json(value: &serde_json::Value) -> Result<Option<Self>> {
        match value {
            serde_json::Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    if let Some(p) = Primitive::from_json(item)? {
                        out.push(p);
                    }
                }
                Ok(Some(DatapointValue::Collection(out)))
            }
            other => Ok(Primitive::from_json(other)?.map(DatapointValue::Primitive)),
        }
    }
}

impl fmt::Display for DatapointValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatapointValue::Primitive(p) => write!(f, "{p}"),
            DatapointValue::Collection(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<Primitive> for DatapointValue {
    fn from(value: Primitive) -> Self {
        DatapointValue::Primitive(value)
    }
}

macro_rules! impl_from_primitive {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for DatapointValue {
                fn from(value: $ty) -> Self {
                    DatapointValue::Primitive(value.into())
                }
            }
        )*
    };
}

impl_from_primitive!(bool, i64, f64, &str, String);

impl From<Vec<Primitive>> for DatapointValue {
    fn from(items: Vec<Primitive>) -> Self {
        DatapointValue::Collection(items)
    }
}
