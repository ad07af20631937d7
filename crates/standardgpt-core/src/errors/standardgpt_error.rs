use serde::{Deserialize, Serialize};

use super::{
    CacheError, CompletionError, ConfigError, EmbeddingError, RetrievalError, SearchError,
};

/// Top-level error for the StandardGPT workspace.
#[derive(Debug, thiserror::Error)]
pub enum StandardGptError {
    #[error("completion error: {0}")]
    CompletionError(#[from] CompletionError),

    #[error("search error: {0}")]
    SearchError(#[from] SearchError),

    #[error("embedding error: {0}")]
    EmbeddingError(#[from] EmbeddingError),

    #[error("cache error: {0}")]
    CacheError(#[from] CacheError),

    #[error("config error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("retrieval error: {0}")]
    RetrievalError(#[from] RetrievalError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("pipeline exceeded its deadline of {timeout_ms} ms")]
    PipelineTimeout { timeout_ms: u64 },

    #[error("request cancelled by the caller")]
    Cancelled,
}

/// Terminal failure classes surfaced to callers.
///
/// Recoverable fallbacks (ambiguous classification, empty memory resolution)
/// are audit records, never failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// A completion, embedding, or search call failed or timed out.
    UpstreamTransient,
    /// A vector of the wrong dimensionality was found or produced.
    CacheIntegrityViolation,
    /// The whole pipeline ran past its deadline.
    PipelineTimeout,
    /// The caller went away.
    Cancelled,
    /// Configuration or programming error.
    Internal,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UpstreamTransient => "upstream_transient",
            Self::CacheIntegrityViolation => "cache_integrity_violation",
            Self::PipelineTimeout => "pipeline_timeout",
            Self::Cancelled => "cancelled",
            Self::Internal => "internal",
        }
    }

    /// Message safe to show an end user. Never includes raw service errors.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::UpstreamTransient => {
                "The search service is temporarily unavailable. Please try again."
            }
            Self::CacheIntegrityViolation => {
                "The request could not be completed because of an internal data error."
            }
            Self::PipelineTimeout => "The request took too long. Please try again.",
            Self::Cancelled => "The request was cancelled.",
            Self::Internal => "The request could not be completed.",
        }
    }

    /// Whether a fresh request has a reasonable chance of succeeding.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::UpstreamTransient | Self::PipelineTimeout)
    }
}

impl StandardGptError {
    /// Classify this error into the terminal failure taxonomy.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::CompletionError(_) | Self::SearchError(_) => FailureKind::UpstreamTransient,
            Self::EmbeddingError(EmbeddingError::DimensionMismatch { .. }) => {
                FailureKind::CacheIntegrityViolation
            }
            Self::EmbeddingError(_) => FailureKind::UpstreamTransient,
            Self::CacheError(CacheError::IntegrityViolation { .. }) => {
                FailureKind::CacheIntegrityViolation
            }
            Self::PipelineTimeout { .. } => FailureKind::PipelineTimeout,
            Self::Cancelled => FailureKind::Cancelled,
            Self::ConfigError(_) | Self::RetrievalError(_) | Self::SerializationError(_) => {
                FailureKind::Internal
            }
        }
    }
}
