//! Predicates: transformations that always produce a bool.

use std::cmp::Ordering;

use lingdb_core::{compare_values, values_equal, Context, DatapointValue, Mode, Primitive};

use super::{expect_collection, expect_primitive, Predicate, TransformError};

fn truthy(value: &Context) -> bool {
    match value {
        DatapointValue::Primitive(Primitive::Bool(b)) => *b,
        DatapointValue::Primitive(Primitive::Int(i)) => *i != 0,
        DatapointValue::Primitive(Primitive::Float(f)) => *f != 0.0,
        DatapointValue::Primitive(Primitive::Text(s)) => !s.is_empty(),
        DatapointValue::Collection(items) => !items.is_empty(),
    }
}

fn incomparable(left: &impl ToString, right: &impl ToString) -> TransformError {
    TransformError::IncomparableValues {
        left: left.to_string(),
        right: right.to_string(),
    }
}

/// True if the input is truthy: `true`, a nonzero number, or a non-empty string or list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bool;

impl Predicate for Bool {
    fn name(&self) -> &str {
        "Bool"
    }

    fn test(&self, input: &Context) -> Result<bool, TransformError> {
        Ok(truthy(input))
    }
}

/// The negation of [`Bool`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Not;

impl Predicate for Not {
    fn name(&self) -> &str {
        "Not"
    }

    fn test(&self, input: &Context) -> Result<bool, TransformError> {
        Ok(!truthy(input))
    }
}

/// True if a collection contains the needle, or a string contains it as a substring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contains {
    needle: Primitive,
}

impl Contains {
    pub fn new(needle: impl Into<Primitive>) -> Self {
        Self {
            needle: needle.into(),
        }
    }
}

impl Predicate for Contains {
    fn name(&self) -> &str {
        "Contains"
    }

    fn test(&self, input: &Context) -> Result<bool, TransformError> {
        match (input, &self.needle) {
            (DatapointValue::Collection(items), needle) => {
                Ok(items.iter().any(|item| values_equal(item, needle)))
            }
            (DatapointValue::Primitive(Primitive::Text(hay)), Primitive::Text(needle)) => {
                Ok(hay.contains(&**needle))
            }
            (other, _) => Err(TransformError::unexpected(
                self.name(),
                "list",
                other.type_name(),
            )),
        }
    }
}

/// True if the input is one of a fixed set of values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainedIn {
    haystack: Vec<Primitive>,
}

impl ContainedIn {
    pub fn new<I, P>(haystack: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Primitive>,
    {
        Self {
            haystack: haystack.into_iter().map(Into::into).collect(),
        }
    }
}

impl Predicate for ContainedIn {
    fn name(&self) -> &str {
        "ContainedIn"
    }

    fn test(&self, input: &Context) -> Result<bool, TransformError> {
        let needle = expect_primitive(self.name(), input)?;
        Ok(self.haystack.iter().any(|hay| values_equal(hay, needle)))
    }
}

/// True if the input string occurs inside any of a fixed set of strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstringContainedIn {
    haystack: Vec<String>,
}

impl SubstringContainedIn {
    pub fn new<I, S>(haystack: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            haystack: haystack.into_iter().map(Into::into).collect(),
        }
    }
}

impl Predicate for SubstringContainedIn {
    fn name(&self) -> &str {
        "SubstringContainedIn"
    }

    fn test(&self, input: &Context) -> Result<bool, TransformError> {
        let needle = input
            .as_text()
            .ok_or_else(|| TransformError::unexpected(self.name(), "str", input.type_name()))?;
        Ok(self.haystack.iter().any(|hay| hay.contains(needle)))
    }
}

/// A mode comparison against a fixed right-hand side, e.g. "at least 3".
///
/// A collection compared against an integer compares its length, as if a
/// [`Length`](super::Length) step came first. A bool compared against an
/// integer compares as 0 or 1. Two collections compare lexicographically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    mode: Mode,
    right: DatapointValue,
}

impl Comparison {
    pub fn new(mode: Mode, right: impl Into<DatapointValue>) -> Self {
        Self {
            mode,
            right: right.into(),
        }
    }

    pub fn equal_to(right: impl Into<DatapointValue>) -> Self {
        Self::new(Mode::Eq, right)
    }

    pub fn not_equal_to(right: impl Into<DatapointValue>) -> Self {
        Self::new(Mode::Neq, right)
    }

    pub fn greater_than(right: impl Into<DatapointValue>) -> Self {
        Self::new(Mode::Gt, right)
    }

    pub fn at_least(right: impl Into<DatapointValue>) -> Self {
        Self::new(Mode::Geq, right)
    }

    pub fn less_than(right: impl Into<DatapointValue>) -> Self {
        Self::new(Mode::Lt, right)
    }

    pub fn at_most(right: impl Into<DatapointValue>) -> Self {
        Self::new(Mode::Leq, right)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn right(&self) -> &DatapointValue {
        &self.right
    }

    fn compare_scalar(&self, left: &Primitive, right: &Primitive) -> Result<bool, TransformError> {
        let promoted;
        let left = match (left, right) {
            (Primitive::Bool(b), Primitive::Int(_)) => {
                promoted = Primitive::Int(i64::from(*b));
                &promoted
            }
            _ => left,
        };
        compare_values(left, right)
            .map(|ordering| self.mode.apply_ordering(ordering))
            .ok_or_else(|| incomparable(left, right))
    }

    fn compare_sequences(
        &self,
        left: &[Primitive],
        right: &[Primitive],
    ) -> Result<bool, TransformError> {
        for (l, r) in left.iter().zip(right) {
            match compare_values(l, r) {
                Some(Ordering::Equal) => continue,
                Some(ordering) => return Ok(self.mode.apply_ordering(ordering)),
                None => return Err(incomparable(l, r)),
            }
        }
        Ok(self.mode.apply_ordering(left.len().cmp(&right.len())))
    }
}

impl Predicate for Comparison {
    fn name(&self) -> &str {
        match self.mode {
            Mode::Eq => "Eq",
            Mode::Neq => "Neq",
            Mode::Gt => "Gt",
            Mode::Geq => "Geq",
            Mode::Lt => "Lt",
            Mode::Leq => "Leq",
        }
    }

    fn test(&self, input: &Context) -> Result<bool, TransformError> {
        match (input, &self.right) {
            (DatapointValue::Collection(items), DatapointValue::Primitive(right))
                if matches!(right, Primitive::Int(_)) =>
            {
                self.compare_scalar(&Primitive::Int(items.len() as i64), right)
            }
            (DatapointValue::Primitive(left), DatapointValue::Primitive(right)) => {
                self.compare_scalar(left, right)
            }
            (DatapointValue::Collection(left), DatapointValue::Collection(right)) => {
                self.compare_sequences(left, right)
            }
            (left, right) => Err(incomparable(left, right)),
        }
    }
}

/// True if two strings are equal ignoring case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EqualsIgnoreCase {
    text: String,
}

impl EqualsIgnoreCase {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into().to_lowercase(),
        }
    }
}

impl Predicate for EqualsIgnoreCase {
    fn name(&self) -> &str {
        "EqualsIgnoreCase"
    }

    fn test(&self, input: &Context) -> Result<bool, TransformError> {
        let text = input
            .as_text()
            .ok_or_else(|| TransformError::unexpected(self.name(), "str", input.type_name()))?;
        Ok(text.to_lowercase() == self.text)
    }
}

/// Validates `[low, high]` with `low < high`.
fn endpoints(name: &str, value: &DatapointValue) -> Result<(Primitive, Primitive), TransformError> {
    let items = match value.as_collection() {
        Some(items) if items.len() == 2 => items,
        _ => {
            return Err(TransformError::invalid(
                name,
                format!("exactly two endpoints required; found: {value}"),
            ))
        }
    };
    let (low, high) = (&items[0], &items[1]);
    match compare_values(low, high) {
        Some(Ordering::Less) => Ok((low.clone(), high.clone())),
        _ => Err(TransformError::invalid(
            name,
            format!("low endpoint was not less than high endpoint: [{low}, {high}]"),
        )),
    }
}

/// Orders `x` against both endpoints.
fn locate(
    low: &Primitive,
    x: &Primitive,
    high: &Primitive,
) -> Result<(Ordering, Ordering), TransformError> {
    let below = compare_values(low, x).ok_or_else(|| incomparable(x, low))?;
    let above = compare_values(x, high).ok_or_else(|| incomparable(x, high))?;
    Ok((below, above))
}

/// True if the input lies strictly between two endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Between {
    low: Primitive,
    high: Primitive,
}

impl Between {
    pub fn new(endpoints_value: &DatapointValue) -> Result<Self, TransformError> {
        let (low, high) = endpoints("Between", endpoints_value)?;
        Ok(Self { low, high })
    }
}

impl Predicate for Between {
    fn name(&self) -> &str {
        "Between"
    }

    fn test(&self, input: &Context) -> Result<bool, TransformError> {
        let x = expect_primitive(self.name(), input)?;
        let (below, above) = locate(&self.low, x, &self.high)?;
        Ok(below.is_lt() && above.is_lt())
    }
}

/// True if the input lies between two endpoints, inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InRange {
    low: Primitive,
    high: Primitive,
}

impl InRange {
    pub fn new(endpoints_value: &DatapointValue) -> Result<Self, TransformError> {
        let (low, high) = endpoints("InRange", endpoints_value)?;
        Ok(Self { low, high })
    }
}

impl Predicate for InRange {
    fn name(&self) -> &str {
        "InRange"
    }

    fn test(&self, input: &Context) -> Result<bool, TransformError> {
        let x = expect_primitive(self.name(), input)?;
        let (below, above) = locate(&self.low, x, &self.high)?;
        Ok(below.is_le() && above.is_le())
    }
}

/// How two collections relate when treated as sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetRelation {
    Subset,
    Superset,
    StrictSubset,
    StrictSuperset,
}

impl SetRelation {
    pub fn name(self) -> &'static str {
        match self {
            SetRelation::Subset => "Subset",
            SetRelation::Superset => "Superset",
            SetRelation::StrictSubset => "StrictSubset",
            SetRelation::StrictSuperset => "StrictSuperset",
        }
    }
}

/// Compares a collection against a fixed collection, ignoring order and repeats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetComparison {
    relation: SetRelation,
    right: Vec<Primitive>,
}

impl SetComparison {
    pub fn new<I, P>(relation: SetRelation, right: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Primitive>,
    {
        Self {
            relation,
            right: right.into_iter().map(Into::into).collect(),
        }
    }

    pub fn relation(&self) -> SetRelation {
        self.relation
    }
}

impl Predicate for SetComparison {
    fn name(&self) -> &str {
        self.relation.name()
    }

    fn test(&self, input: &Context) -> Result<bool, TransformError> {
        let left = expect_collection(self.name(), input)?;
        let within = |xs: &[Primitive], ys: &[Primitive]| {
            xs.iter().all(|x| ys.iter().any(|y| values_equal(x, y)))
        };
        let left_in_right = within(left, &self.right);
        let right_in_left = within(&self.right, left);
        Ok(match self.relation {
            SetRelation::Subset => left_in_right,
            SetRelation::Superset => right_in_left,
            SetRelation::StrictSubset => left_in_right && !right_in_left,
            SetRelation::StrictSuperset => right_in_left && !left_in_right,
        })
    }
}

impl_predicate!(
    Bool,
    Not,
    Contains,
    ContainedIn,
    SubstringContainedIn,
    Comparison,
    EqualsIgnoreCase,
    Between,
    InRange,
    SetComparison,
);
