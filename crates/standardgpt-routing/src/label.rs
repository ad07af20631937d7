//! Closed set of classifier labels.

use serde::{Deserialize, Serialize};

/// Route label returned by the classify call. Free text never travels past
/// [`RouteLabel::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteLabel {
    /// Mentions one or more standard numbers.
    Including,
    /// General content question.
    Without,
    /// Personnel / HR policy.
    Personal,
    /// Follow-up to a standard discussed earlier.
    Memory,
}

impl RouteLabel {
    /// Parse classifier output. Case and surrounding quotes or punctuation are
    /// ignored; anything outside the closed set is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let cleaned = raw
            .trim()
            .trim_matches(|c: char| c.is_whitespace() || "\"'`()[]{}.,!?;:".contains(c))
            .to_lowercase();
        match cleaned.as_str() {
            "including" | "reference" | "reference-filtered" | "reference_filtered" => {
                Some(Self::Including)
            }
            "without" | "content" | "content-only" | "content_only" => Some(Self::Without),
            "personal" | "handbook" | "personal-topic" | "personal_topic" => Some(Self::Personal),
            "memory" | "context" | "context-dependent" | "context_dependent" => Some(Self::Memory),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Including => "including",
            Self::Without => "without",
            Self::Personal => "personal",
            Self::Memory => "memory",
        }
    }
}
