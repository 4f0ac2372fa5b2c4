//! Query directives: bookkeeping steps that never change per-language results.

use std::fmt;

/// An instruction to the engine placed between transformations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryDirective {
    /// Snapshot the current result of every language as context.
    ExtractContext,
    /// Drop every language whose current result is `false`.
    FilterLanguageSet,
}

impl QueryDirective {
    /// Every name a directive is requested by, aliases included.
    pub const NAMES: &'static [(&'static str, QueryDirective)] = &[
        ("ExtractContext", QueryDirective::ExtractContext),
        ("FilterLanguageSet", QueryDirective::FilterLanguageSet),
        ("FilterLanguages", QueryDirective::FilterLanguageSet),
    ];

    /// Resolves a directive by registry name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::NAMES
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|&(_, directive)| directive)
    }

    pub fn name(self) -> &'static str {
        match self {
            QueryDirective::ExtractContext => "ExtractContext",
            QueryDirective::FilterLanguageSet => "FilterLanguageSet",
        }
    }
}

impl fmt::Display for QueryDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(
            QueryDirective::from_name("FilterLanguages"),
            Some(QueryDirective::FilterLanguageSet)
        );
        assert_eq!(QueryDirective::from_name("filterlanguages"), None);
        for directive in [QueryDirective::ExtractContext, QueryDirective::FilterLanguageSet] {
            assert_eq!(QueryDirective::from_name(directive.name()), Some(directive));
        }
    }
}
