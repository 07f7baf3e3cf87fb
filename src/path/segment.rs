//! Path segment parsing.

use crate::value::Key;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Matches `<key>::<fn>(<arg>)` against the whole segment. The key is lazy so
/// that `a::b::first()` splits into key `a::b`.
static SELECTOR_CLAUSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<key>.+?)::(?P<fn>[A-Za-z]+)\((?P<arg>[^()]*)\)$")
        .expect("selector clause pattern should compile")
});

/// Selector is a positional pseudo-selector applied to a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    /// The container's parent.
    Parent,
    /// The n-th child, counting from 1.
    NthChild(i64),
    First,
    Last,
}

impl Selector {
    /// Builds a selector from its case-insensitive name and raw argument.
    ///
    /// Returns None for unknown names, and for `nthChild` with an argument
    /// that is not an integer.
    pub fn from_clause(name: &str, argument: &str) -> Option<Selector> {
        match name.to_ascii_lowercase().as_str() {
            "parent" => Some(Selector::Parent),
            "first" => Some(Selector::First),
            "last" => Some(Selector::Last),
            "nthchild" => argument.trim().parse().ok().map(Selector::NthChild),
            _ => None,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Parent => write!(f, "parent()"),
            Selector::NthChild(n) => write!(f, "nthChild({})", n),
            Selector::First => write!(f, "first()"),
            Selector::Last => write!(f, "last()"),
        }
    }
}

/// Segment is one parsed path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// The key to look up, without any selector clause.
    pub key: Key,
    /// The textual form of `key` as written in the path.
    pub raw_key: String,
    pub selector: Option<Selector>,
    /// The raw text between the selector's parentheses.
    pub argument: Option<String>,
}

impl Segment {
    /// Parses a raw segment. Never fails: anything that is not a complete,
    /// known selector clause is a literal key.
    pub fn parse(raw: &str) -> Segment {
        if let Some(caps) = SELECTOR_CLAUSE.captures(raw) {
            let argument = &caps["arg"];
            if let Some(selector) = Selector::from_clause(&caps["fn"], argument) {
                let raw_key = caps["key"].to_string();
                return Segment {
                    key: Key::parse(&raw_key),
                    raw_key,
                    selector: Some(selector),
                    argument: Some(argument.to_string()),
                };
            }
        }

        Segment::literal(raw)
    }

    /// Creates a segment that is a plain key.
    pub fn literal(raw: &str) -> Segment {
        Segment {
            key: Key::parse(raw),
            raw_key: raw.to_string(),
            selector: None,
            argument: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_key() {
        let seg = Segment::parse("name");
        assert_eq!(seg.key, Key::parse("name"));
        assert_eq!(seg.selector, None);
        assert_eq!(seg.argument, None);
    }

    #[test]
    fn test_integer_key() {
        assert_eq!(Segment::parse("0").key, Key::Index(0));
    }

    #[test]
    fn test_selectors_are_case_insensitive() {
        assert_eq!(Segment::parse("a::FIRST()").selector, Some(Selector::First));
        assert_eq!(Segment::parse("a::Last()").selector, Some(Selector::Last));
        assert_eq!(Segment::parse("a::parent()").selector, Some(Selector::Parent));
        assert_eq!(
            Segment::parse("roles::nthchild(2)").selector,
            Some(Selector::NthChild(2))
        );
    }

    #[test]
    fn test_selector_keeps_raw_argument() {
        let seg = Segment::parse("roles::nthChild( 2 )");
        assert_eq!(seg.key, Key::parse("roles"));
        assert_eq!(seg.selector, Some(Selector::NthChild(2)));
        assert_eq!(seg.argument.as_deref(), Some(" 2 "));
    }

    #[test]
    fn test_key_containing_separator_like_text() {
        let seg = Segment::parse("a::b::first()");
        assert_eq!(seg.key, Key::parse("a::b"));
        assert_eq!(seg.selector, Some(Selector::First));
    }

    #[test]
    fn test_malformed_clauses_fall_back_to_literal() {
        for raw in [
            "a::unknown()",
            "a::first(",
            "a::first()x",
            "::first()",
            "a::nthChild(two)",
            "f(x)",
            "a::",
        ] {
            let seg = Segment::parse(raw);
            assert_eq!(seg.selector, None, "{}", raw);
            assert_eq!(seg.raw_key, raw);
        }
    }
}
