use serde::Serialize;

use standardgpt_cache::CacheStats;
use standardgpt_observability::MetricsSnapshot;

/// Everything the stats surface shows.
#[derive(Debug, Clone, Serialize)]
pub struct OrchestratorStats {
    pub metrics: MetricsSnapshot,
    pub completion_cache: CacheStats,
    pub embedding_cache: CacheStats,
    pub active_sessions: usize,
}
