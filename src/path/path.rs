//! Path splitting.

/// The separator used when none is given.
pub const DEFAULT_SEPARATOR: &str = "/";

/// The wildcard segment.
pub const WILDCARD: &str = "*";

/// Path is a raw path split on its separator.
///
/// Segments stay textual until they are resolved, so that wildcard expansion
/// can substitute candidates and rebuild concrete path strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path<'a> {
    separator: &'a str,
    segments: Vec<&'a str>,
}

impl<'a> Path<'a> {
    /// Splits `path` on `separator`. An empty separator keeps the path whole.
    pub fn parse(path: &'a str, separator: &'a str) -> Self {
        let segments = if separator.is_empty() {
            vec![path]
        } else {
            path.split(separator).collect()
        };
        Path {
            separator,
            segments,
        }
    }

    pub fn separator(&self) -> &'a str {
        self.separator
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns true if any segment is the wildcard.
    pub fn is_wildcard(&self) -> bool {
        self.segments.iter().any(|s| *s == WILDCARD)
    }

    pub fn raw_segments(&self) -> &[&'a str] {
        &self.segments
    }

    /// Splits off the last segment.
    pub fn split_last(&self) -> Option<(&'a str, &[&'a str])> {
        self.segments
            .split_last()
            .map(|(last, init)| (*last, init))
    }
}

/// Joins textual segments with `separator`.
pub fn join_segments<S: AsRef<str>>(segments: &[S], separator: &str) -> String {
    segments
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(separator)
}
