use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recoverable fallback taken while answering a question.
///
/// Audit records are internal. They never reach the end user as errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub kind: AuditKind,
    /// Pipeline component that fell back, e.g. `router`.
    pub component: String,
    pub detail: String,
    pub timestamp: DateTime<Utc>,
}

impl AuditRecord {
    pub fn new(kind: AuditKind, component: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind,
            component: component.into(),
            detail: detail.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditKind {
    /// Classifier returned an unrecognized label, failed, or timed out.
    ClassificationAmbiguous,
    /// Context-dependent route resolved no references and was demoted.
    MemoryResolutionEmpty,
    /// Standard extraction returned nothing usable; recognizer output kept.
    ExtractionFallback,
    /// Query optimization failed or timed out; raw question used.
    OptimizationFallback,
    /// Embedding service failed; query sent without a vector clause.
    EmbeddingDegraded,
}

impl AuditKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClassificationAmbiguous => "classification_ambiguous",
            Self::MemoryResolutionEmpty => "memory_resolution_empty",
            Self::ExtractionFallback => "extraction_fallback",
            Self::OptimizationFallback => "optimization_fallback",
            Self::EmbeddingDegraded => "embedding_degraded",
        }
    }
}
