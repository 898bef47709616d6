//! Loose dotted version ordering
//!
//! Versions are split on `.` and compared field by field. This is deliberately
//! not semver: there are no pre-release or build-metadata rules.
//!
//! - A field made only of ASCII digits is numeric, anything else is an opaque token
//! - Missing trailing fields count as `0`, so `1.0` equals `1.0.0`
//! - Numeric fields sort before token fields when the kinds differ

use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A single component of a dotted version.
///
/// Variant order matters: the derived `Ord` puts every `Numeric` before every `Token`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Numeric(u64),
    Token(String),
}

impl Field {
    fn parse(raw: &str) -> Self {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = raw.parse() {
                return Field::Numeric(n);
            }
        }
        Field::Token(raw.to_string())
    }

    fn is_zero(&self) -> bool {
        matches!(self, Field::Numeric(0))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Numeric(n) => write!(f, "{}", n),
            Field::Token(t) => f.write_str(t),
        }
    }
}

/// A version value with loose field-wise ordering.
///
/// Equality, ordering and hashing all ignore trailing zero fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Version {
    text: String,
    fields: Vec<Field>,
}

impl Version {
    /// Parse a version string. Never fails: unparseable fields become tokens.
    ///
    /// Examples:
    /// - "1.2.3" -> [1, 2, 3]
    /// - "2.1.a" -> [2, 1, "a"]
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        Self {
            text: text.to_string(),
            fields: text.split('.').map(Field::parse).collect(),
        }
    }

    /// The text this version was parsed from (trimmed).
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Fields without trailing zeros.
    fn significant(&self) -> &[Field] {
        let len = self
            .fields
            .iter()
            .rposition(|f| !f.is_zero())
            .map_or(0, |i| i + 1);
        &self.fields[..len]
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let zero = Field::Numeric(0);
        let len = self.fields.len().max(other.fields.len());
        let lhs = self.fields.iter().chain(iter::repeat(&zero));
        let rhs = other.fields.iter().chain(iter::repeat(&zero));

        lhs.zip(rhs)
            .take(len)
            .map(|(a, b)| a.cmp(b))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant().hash(state);
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for Version {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for Version {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for Version {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<Version> for String {
    fn from(v: Version) -> Self {
        v.text
    }
}
