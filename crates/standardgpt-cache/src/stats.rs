use serde::Serialize;

/// Counter snapshot for one cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub expired_evictions: u64,
    pub capacity_evictions: u64,
    /// Callers that joined an in-flight computation instead of starting one.
    pub coalesced: u64,
    pub size: usize,
    pub max_entries: usize,
}

impl CacheStats {
    /// Hits over lookups, 0.0 before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// One row of a "most used entries" listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntrySummary {
    /// Shortened key.
    pub key: String,
    pub hit_count: u64,
    pub age_secs: u64,
}
