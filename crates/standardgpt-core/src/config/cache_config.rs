use serde::{Deserialize, Serialize};

use super::defaults;

/// Completion cache configuration. TTLs live on the prompt records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub max_entries: usize,
    /// Minimum seconds between full sweeps of expired entries.
    pub purge_interval_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: defaults::DEFAULT_COMPLETION_CACHE_MAX_ENTRIES,
            purge_interval_secs: defaults::DEFAULT_CACHE_PURGE_INTERVAL_SECS,
        }
    }
}
