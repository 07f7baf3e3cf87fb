//! Container keys.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Key names one entry of a container.
///
/// Sequence-shaped containers use `Index` keys; map-shaped containers use
/// `Name` keys. A single container may mix both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Index(i64),
    Name(String),
}

impl Key {
    /// Creates a key from its textual form.
    ///
    /// Text that is the canonical decimal rendering of an integer becomes an
    /// `Index`; `"007"`, `"+1"` and `"1.0"` stay names.
    pub fn parse(text: &str) -> Self {
        match text.parse::<i64>() {
            Ok(i) if i.to_string() == text => Key::Index(i),
            _ => Key::Name(text.to_string()),
        }
    }

    /// Returns true if this is an integer key.
    pub fn is_index(&self) -> bool {
        matches!(self, Key::Index(_))
    }

    pub fn as_index(&self) -> Option<i64> {
        match self {
            Key::Index(i) => Some(*i),
            Key::Name(_) => None,
        }
    }

}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(i) => write!(f, "{}", i),
            Key::Name(name) => write!(f, "{}", name),
        }
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Index(i)
    }
}

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Key::Index(i as i64)
    }
}

impl From<&str> for Key {
    fn from(text: &str) -> Self {
        Key::parse(text)
    }
}

impl From<String> for Key {
    fn from(text: String) -> Self {
        Key::parse(&text)
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct KeyVisitor;

impl<'de> Visitor<'de> for KeyVisitor {
    type Value = Key;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or integer key")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Key, E> {
        Ok(Key::Index(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Key, E> {
        i64::try_from(v)
            .map(Key::Index)
            .or_else(|_| Ok(Key::Name(v.to_string())))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Key, E> {
        Ok(Key::Name(v.to_string()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Key, E> {
        Ok(Key::parse(v))
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Key, D::Error> {
        deserializer.deserialize_any(KeyVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_integers() {
        assert_eq!(Key::parse("0"), Key::Index(0));
        assert_eq!(Key::parse("42"), Key::Index(42));
        assert_eq!(Key::parse("-3"), Key::Index(-3));
    }

    #[test]
    fn test_parse_non_canonical_stays_name() {
        assert_eq!(Key::parse("007"), Key::Name("007".into()));
        assert_eq!(Key::parse("+1"), Key::Name("+1".into()));
        assert_eq!(Key::parse("1.0"), Key::Name("1.0".into()));
        assert_eq!(Key::parse(""), Key::Name(String::new()));
    }

    #[test]
    fn test_display_matches_parse() {
        for text in ["12", "name", "a::b"] {
            assert_eq!(Key::parse(text).to_string(), text);
        }
    }
}
