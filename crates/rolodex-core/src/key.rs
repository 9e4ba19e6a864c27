use serde::{Deserialize, Serialize};
use std::fmt;

/// One scalar component of a composite index key.
///
/// Components of different kinds compare by kind first (integers sort before
/// text), matching how the backing index orders mixed-type values.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KeyPart {
    Int(i64),
    Text(String),
}

impl fmt::Display for KeyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for KeyPart {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for KeyPart {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for KeyPart {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

/// Composite sort key into the backing index.
///
/// Keys order lexicographically over their parts, so a single-part prefix
/// key like `["S"]` sorts immediately before every full key starting with a
/// surname `>= "S"`. The empty key is reserved: it marks "no further rows"
/// at the extreme of a traversal and never addresses a real row.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IndexKey(Vec<KeyPart>);

impl IndexKey {
    pub fn new(parts: Vec<KeyPart>) -> Self {
        Self(parts)
    }

    /// The reserved empty key marking the end of the table in the traversal
    /// direction.
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Single-part text key, used for letter-prefix jumps.
    pub fn text(part: impl Into<String>) -> Self {
        Self(vec![KeyPart::Text(part.into())])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn parts(&self) -> &[KeyPart] {
        &self.0
    }
}

impl From<Vec<KeyPart>> for IndexKey {
    fn from(parts: Vec<KeyPart>) -> Self {
        Self(parts)
    }
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<end>");
        }
        let parts: Vec<String> = self.0.iter().map(|p| p.to_string()).collect();
        write!(f, "{}", parts.join("/"))
    }
}
