use serde::{Deserialize, Serialize};

use super::defaults;

/// Document search engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub url: String,
    pub index: String,
    pub api_key_env: String,
    pub timeout_ms: u64,
    /// Result size for reference-filtered and context-dependent queries.
    pub reference_size: usize,
    /// Result size for handbook-scoped queries.
    pub handbook_size: usize,
    /// Result size for content-only queries.
    pub content_size: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            url: defaults::DEFAULT_SEARCH_URL.to_string(),
            index: defaults::DEFAULT_SEARCH_INDEX.to_string(),
            api_key_env: defaults::DEFAULT_SEARCH_API_KEY_ENV.to_string(),
            timeout_ms: defaults::DEFAULT_SEARCH_TIMEOUT_MS,
            reference_size: defaults::DEFAULT_REFERENCE_RESULT_SIZE,
            handbook_size: defaults::DEFAULT_HANDBOOK_RESULT_SIZE,
            content_size: defaults::DEFAULT_CONTENT_RESULT_SIZE,
        }
    }
}
