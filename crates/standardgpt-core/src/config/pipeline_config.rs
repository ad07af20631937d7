use serde::{Deserialize, Serialize};

use super::defaults;

/// Orchestrator deadlines and limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Total wall-clock bound for one question.
    pub timeout_ms: u64,
    /// Route classification call; expiry falls back to content-only.
    pub classification_timeout_ms: u64,
    /// Query optimization calls; expiry falls back to the raw question.
    pub optimization_timeout_ms: u64,
    /// Upper bound on the rendered fragment context given to the answer call.
    pub max_context_chars: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            timeout_ms: defaults::DEFAULT_PIPELINE_TIMEOUT_MS,
            classification_timeout_ms: defaults::DEFAULT_CLASSIFICATION_TIMEOUT_MS,
            optimization_timeout_ms: defaults::DEFAULT_OPTIMIZATION_TIMEOUT_MS,
            max_context_chars: defaults::DEFAULT_MAX_CONTEXT_CHARS,
        }
    }
}
