//! Namespace value type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A user-chosen identifier partitioning a document corpus and its index.
///
/// Blank input resolves to [`Namespace::DEFAULT`], so a `Namespace` is never
/// empty by construction. Non-blank input is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Namespace(String);

impl Namespace {
    /// Namespace used whenever the user leaves the field blank.
    pub const DEFAULT: &'static str = "default";

    pub fn new(input: impl Into<String>) -> Self {
        let input = input.into();
        if input.trim().is_empty() {
            Self(Self::DEFAULT.to_string())
        } else {
            Self(input)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl From<String> for Namespace {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for Namespace {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<Namespace> for String {
    fn from(value: Namespace) -> Self {
        value.0
    }
}

impl AsRef<str> for Namespace {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
