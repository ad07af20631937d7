use std::fmt;

use serde::{Deserialize, Serialize};

/// Retrieval strategy chosen for a question. Exactly one per question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteDecision {
    /// Restricted to documents matching explicit standard identifiers.
    ReferenceFiltered,
    /// Free-text and semantic match with no identifier constraint.
    ContentOnly,
    /// Restricted to the personnel handbook.
    Handbook,
    /// Follow-up resolved against earlier turns.
    ContextDependent,
}

impl RouteDecision {
    pub const ALL: [RouteDecision; 4] = [
        Self::ReferenceFiltered,
        Self::ContentOnly,
        Self::Handbook,
        Self::ContextDependent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReferenceFiltered => "reference_filtered",
            Self::ContentOnly => "content_only",
            Self::Handbook => "handbook",
            Self::ContextDependent => "context_dependent",
        }
    }

    /// Whether this route's query is filtered on standard identifiers.
    pub fn needs_references(&self) -> bool {
        matches!(self, Self::ReferenceFiltered | Self::ContextDependent)
    }
}

impl fmt::Display for RouteDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
