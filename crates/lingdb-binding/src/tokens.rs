//! Request tokens: decoding, value coercion and splitting into query specs.

use std::fmt;

use lingdb_core::{DatapointValue, Primitive};

/// One `key=value` parameter from a request, in request order.
pub type Token = (String, String);

/// The tokens describing a single query.
pub type QuerySpec = Vec<Token>;

/// The key that separates adjacent queries in one request.
pub const QUERY_DELIMITER: &str = "Query";

/// The key that selects a query's starting dataset.
pub const DATASET_KEY: &str = "Dataset";

/// A token value after coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    Scalar(Primitive),
    List(Vec<Primitive>),
}

impl TokenValue {
    /// Coerces a raw token value.
    ///
    /// A value containing `delimiter` becomes a list of element-wise coerced
    /// segments, with empty segments dropped. Otherwise `true`/`false` (any
    /// case) become bools, then integers are tried, and anything else stays
    /// text.
    ///
    /// ```
    /// use lingdb_binding::TokenValue;
    /// use lingdb_core::Primitive;
    ///
    /// assert_eq!(TokenValue::coerce("42", ";"), TokenValue::Scalar(Primitive::Int(42)));
    /// assert_eq!(TokenValue::coerce("FALSE", ";"), TokenValue::Scalar(Primitive::Bool(false)));
    /// assert_eq!(
    ///     TokenValue::coerce("4;7", ";"),
    ///     TokenValue::List(vec![Primitive::Int(4), Primitive::Int(7)])
    /// );
    /// ```
    pub fn coerce(raw: &str, delimiter: &str) -> Self {
        if !delimiter.is_empty() && raw.contains(delimiter) {
            return TokenValue::List(
                raw.split(delimiter)
                    .filter(|segment| !segment.is_empty())
                    .map(coerce_primitive)
                    .collect(),
            );
        }
        TokenValue::Scalar(coerce_primitive(raw))
    }

    pub fn as_scalar(&self) -> Option<&Primitive> {
        match self {
            TokenValue::Scalar(p) => Some(p),
            TokenValue::List(_) => None,
        }
    }

    /// The value as list elements; a scalar is a one-element list.
    pub fn elements(&self) -> Vec<Primitive> {
        match self {
            TokenValue::Scalar(p) => vec![p.clone()],
            TokenValue::List(items) => items.clone(),
        }
    }
}

impl From<TokenValue> for DatapointValue {
    fn from(value: TokenValue) -> Self {
        match value {
            TokenValue::Scalar(p) => DatapointValue::Primitive(p),
            TokenValue::List(items) => DatapointValue::Collection(items),
        }
    }
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenValue::Scalar(p) => write!(f, "{p}"),
            TokenValue::List(items) => {
                let items: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", items.join(", "))
            }
        }
    }
}

fn coerce_primitive(raw: &str) -> Primitive {
    if raw.eq_ignore_ascii_case("true") {
        return Primitive::Bool(true);
    }
    if raw.eq_ignore_ascii_case("false") {
        return Primitive::Bool(false);
    }
    match raw.parse::<i64>() {
        Ok(n) => Primitive::Int(n),
        Err(_) => Primitive::text(raw),
    }
}

/// Decodes an `application/x-www-form-urlencoded` query string into tokens,
/// keeping their order and any repeated keys. A leading `?` is ignored.
pub fn parse_query_string(query: &str) -> Vec<Token> {
    let query = query.strip_prefix('?').unwrap_or(query);
    url::form_urlencoded::parse(query.as_bytes())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

/// Splits a request's tokens into one spec per query.
///
/// `Query` tokens delimit adjacent queries. A leading `Query` is optional
/// and empty specs are dropped.
pub fn split_query_specs(tokens: &[Token]) -> Vec<QuerySpec> {
    let mut specs = Vec::new();
    let mut current = QuerySpec::new();
    for token in tokens {
        if token.0 == QUERY_DELIMITER {
            if !current.is_empty() {
                specs.push(std::mem::take(&mut current));
            }
        } else {
            current.push(token.clone());
        }
    }
    if !current.is_empty() {
        specs.push(current);
    }
    specs
}

/// Returns the dataset named by a leading `Dataset` token, if any.
pub fn requested_dataset(spec: &[Token]) -> Option<&str> {
    spec.first()
        .filter(|(key, _)| key == DATASET_KEY)
        .map(|(_, value)| value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(pairs: &[(&str, &str)]) -> Vec<Token> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_coerce_scalars() {
        assert_eq!(
            TokenValue::coerce("true", ";"),
            TokenValue::Scalar(Primitive::Bool(true))
        );
        assert_eq!(
            TokenValue::coerce("-3", ";"),
            TokenValue::Scalar(Primitive::Int(-3))
        );
        assert_eq!(
            TokenValue::coerce("consonants", ";"),
            TokenValue::Scalar(Primitive::text("consonants"))
        );
        assert_eq!(
            TokenValue::coerce("", ";"),
            TokenValue::Scalar(Primitive::text(""))
        );
    }

    #[test]
    fn test_coerce_lists() {
        assert_eq!(
            TokenValue::coerce("p;t;k", ";"),
            TokenValue::List(vec![
                Primitive::text("p"),
                Primitive::text("t"),
                Primitive::text("k"),
            ])
        );
        assert_eq!(
            TokenValue::coerce("1;;true;", ";"),
            TokenValue::List(vec![Primitive::Int(1), Primitive::Bool(true)])
        );
        assert_eq!(TokenValue::coerce(";", ";"), TokenValue::List(vec![]));
        assert_eq!(
            TokenValue::coerce("a,b", ","),
            TokenValue::List(vec![Primitive::text("a"), Primitive::text("b")])
        );
    }

    #[test]
    fn test_parse_query_string() {
        let parsed = parse_query_string("?Get=num%20consonants&Intersection=p%3Bt&Geq=2&Get=name");
        assert_eq!(
            parsed,
            tokens(&[
                ("Get", "num consonants"),
                ("Intersection", "p;t"),
                ("Geq", "2"),
                ("Get", "name"),
            ])
        );
    }

    #[test]
    fn test_split_query_specs() {
        let all = tokens(&[
            ("Get", "consonants"),
            ("Length", ""),
            ("Query", ""),
            ("Query", ""),
            ("Dataset", "F21"),
            ("GetName", ""),
            ("Query", "trailing"),
        ]);
        let specs = split_query_specs(&all);
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0], tokens(&[("Get", "consonants"), ("Length", "")]));
        assert_eq!(requested_dataset(&specs[0]), None);
        assert_eq!(requested_dataset(&specs[1]), Some("F21"));

        assert!(split_query_specs(&tokens(&[("Query", "")])).is_empty());
    }
}
