//! Mode-based comparison and k-of-set matching.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LingDbError;
use crate::value::Primitive;

/// One of the six comparison operators.
///
/// `"all"` parses as [`Mode::Geq`]; callers that accept it compare against the
/// full target size (see [`Mode::is_all_alias`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Eq,
    Neq,
    Gt,
    Geq,
    Lt,
    Leq,
}

impl Mode {
    pub const ALL: [Mode; 6] = [Mode::Eq, Mode::Neq, Mode::Gt, Mode::Geq, Mode::Lt, Mode::Leq];

    /// Returns true if `s` is the `all` alias rather than a plain mode.
    pub fn is_all_alias(s: &str) -> bool {
        s.trim().eq_ignore_ascii_case("all")
    }

    /// Applies this mode to an ordering of `a` relative to `b`.
    pub fn apply_ordering(self, ordering: Ordering) -> bool {
        match self {
            Mode::Eq => ordering.is_eq(),
            Mode::Neq => ordering.is_ne(),
            Mode::Gt => ordering.is_gt(),
            Mode::Geq => ordering.is_ge(),
            Mode::Lt => ordering.is_lt(),
            Mode::Leq => ordering.is_le(),
        }
    }

    /// Applies this mode to `a` and `b`. Incomparable values only satisfy `Neq`.
    pub fn apply<T: PartialOrd + ?Sized>(self, a: &T, b: &T) -> bool {
        match a.partial_cmp(b) {
            Some(ordering) => self.apply_ordering(ordering),
            None => self == Mode::Neq,
        }
    }

    /// The canonical short code, as accepted by [`Mode::from_str`].
    pub fn code(self) -> &'static str {
        match self {
            Mode::Eq => "eq",
            Mode::Neq => "neq",
            Mode::Gt => "gt",
            Mode::Geq => "geq",
            Mode::Lt => "lt",
            Mode::Leq => "leq",
        }
    }

    /// The English phrase used in query descriptions ("at least", ...).
    pub fn phrase(self) -> &'static str {
        match self {
            Mode::Eq => "exactly",
            Mode::Neq => "not equal to",
            Mode::Gt => "more than",
            Mode::Geq => "at least",
            Mode::Lt => "less than",
            Mode::Leq => "at most",
        }
    }
}

impl FromStr for Mode {
    type Err = LingDbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let mode = match normalized.as_str() {
            "eq" | "==" | "=" | "exactly" => Mode::Eq,
            "neq" | "ne" | "!=" | "<>" | "not equal to" => Mode::Neq,
            "gt" | ">" | "more than" => Mode::Gt,
            "geq" | "ge" | ">=" | "at least" | "all" => Mode::Geq,
            "lt" | "<" | "less than" => Mode::Lt,
            "leq" | "le" | "<=" | "at most" => Mode::Leq,
            _ => return Err(LingDbError::InvalidMode(s.to_string())),
        };
        Ok(mode)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Applies `mode` to two ordered values.
pub fn compare<T: PartialOrd + ?Sized>(mode: Mode, a: &T, b: &T) -> bool {
    mode.apply(a, b)
}

/// Checks if two primitives are equal. Integers and floats compare numerically.
pub fn values_equal(a: &Primitive, b: &Primitive) -> bool {
    match (a, b) {
        (Primitive::Int(x), Primitive::Float(y)) => (*x as f64 - y).abs() < f64::EPSILON,
        (Primitive::Float(x), Primitive::Int(y)) => (x - *y as f64).abs() < f64::EPSILON,
        (Primitive::Float(x), Primitive::Float(y)) => {
            (x - y).abs() < f64::EPSILON || (x.is_nan() && y.is_nan())
        }
        _ => a == b,
    }
}

/// Orders two primitives of compatible type.
///
/// Returns `None` for mixed types other than int/float.
pub fn compare_values(a: &Primitive, b: &Primitive) -> Option<Ordering> {
    match (a, b) {
        (Primitive::Int(x), Primitive::Int(y)) => Some(x.cmp(y)),
        (Primitive::Float(x), Primitive::Float(y)) => x.partial_cmp(y),
        (Primitive::Int(x), Primitive::Float(y)) => (*x as f64).partial_cmp(y),
        (Primitive::Float(x), Primitive::Int(y)) => x.partial_cmp(&(*y as f64)),
        (Primitive::Text(x), Primitive::Text(y)) => Some(x.cmp(y)),
        (Primitive::Bool(x), Primitive::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Applies `mode` to two primitives, or `None` if they cannot be ordered.
///
/// `Eq` and `Neq` are always answerable.
pub fn compare_primitives(mode: Mode, a: &Primitive, b: &Primitive) -> Option<bool> {
    match mode {
        Mode::Eq => Some(values_equal(a, b)),
        Mode::Neq => Some(!values_equal(a, b)),
        _ => compare_values(a, b).map(|ordering| mode.apply_ordering(ordering)),
    }
}

/// Returns the elements of `actual` that also occur in `targets`, in `actual`'s order.
pub fn intersect_ordered(actual: &[Primitive], targets: &[Primitive]) -> Vec<Primitive> {
    actual
        .iter()
        .filter(|item| targets.iter().any(|t| values_equal(item, t)))
        .cloned()
        .collect()
}

/// Outcome of a k-of-set match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetMatch {
    /// The size comparison failed.
    NoMatch,
    /// The size comparison passed; holds the (possibly empty) intersection.
    Match(Vec<Primitive>),
}

impl SetMatch {
    pub fn is_match(&self) -> bool {
        matches!(self, SetMatch::Match(_))
    }

    /// Returns the matched elements, if any.
    pub fn elements(&self) -> Option<&[Primitive]> {
        match self {
            SetMatch::Match(items) => Some(items),
            SetMatch::NoMatch => None,
        }
    }
}

/// Matches `actual` against `targets`: passes when `|actual ∩ targets|` compares
/// to `k` under `mode`.
///
/// A passing comparison with an empty intersection (e.g. "at most 1 of ...")
/// is still a [`SetMatch::Match`].
pub fn match_set(actual: &[Primitive], targets: &[Primitive], k: usize, mode: Mode) -> SetMatch {
    let intersection = intersect_ordered(actual, targets);
    if mode.apply(&intersection.len(), &k) {
        SetMatch::Match(intersection)
    } else {
        SetMatch::NoMatch
    }
}
