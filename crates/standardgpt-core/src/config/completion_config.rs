use serde::{Deserialize, Serialize};

use super::defaults;

/// Completion service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Chat-completions endpoint (OpenAI-compatible).
    pub endpoint: String,
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    /// Per-call timeout.
    pub timeout_ms: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::DEFAULT_COMPLETION_ENDPOINT.to_string(),
            model: defaults::DEFAULT_COMPLETION_MODEL.to_string(),
            api_key_env: defaults::DEFAULT_COMPLETION_API_KEY_ENV.to_string(),
            timeout_ms: defaults::DEFAULT_COMPLETION_TIMEOUT_MS,
        }
    }
}
