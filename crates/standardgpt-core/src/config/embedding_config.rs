use serde::{Deserialize, Serialize};

use super::defaults;

/// Embedding subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub endpoint: String,
    /// Name of the environment variable holding an optional bearer token.
    pub api_key_env: String,
    /// Vector dimensionality. Fixed for the process lifetime.
    pub dimensions: usize,
    /// TTL shared by every embedding cache entry.
    pub ttl_secs: u64,
    /// Embedding cache max entries.
    pub max_entries: usize,
    pub timeout_ms: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::DEFAULT_EMBEDDING_ENDPOINT.to_string(),
            api_key_env: defaults::DEFAULT_EMBEDDING_API_KEY_ENV.to_string(),
            dimensions: defaults::DEFAULT_EMBEDDING_DIMENSIONS,
            ttl_secs: defaults::DEFAULT_EMBEDDING_TTL_SECS,
            max_entries: defaults::DEFAULT_EMBEDDING_MAX_ENTRIES,
            timeout_ms: defaults::DEFAULT_EMBEDDING_TIMEOUT_MS,
        }
    }
}
