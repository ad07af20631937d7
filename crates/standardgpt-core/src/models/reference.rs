use std::fmt;

use serde::{Deserialize, Serialize};

/// A normalized standard identifier, e.g. `NS 3457-7` or `M-004:2018`.
///
/// Casing and punctuation are preserved as written; only whitespace is
/// collapsed and a bare year is joined with a colon.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StandardReference(String);

impl StandardReference {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Same identifier regardless of letter case (`ns 3420` and `NS 3420`).
    pub fn same_as(&self, other: &StandardReference) -> bool {
        self.0.to_lowercase() == other.0.to_lowercase()
    }

    /// True when the identifier starts with a letter series such as `NS` or `M`.
    /// A bare numeric reference is a weak match.
    pub fn has_alphabetic_prefix(&self) -> bool {
        self.0.chars().next().is_some_and(char::is_alphabetic)
    }
}

impl fmt::Display for StandardReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StandardReference {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StandardReference {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
