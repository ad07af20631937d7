//! Per-question log: route, references, fragments, latency.

use std::collections::VecDeque;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use standardgpt_core::models::RouteDecision;

/// A single query log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryLogEntry {
    pub request_id: String,
    pub session_id: String,
    pub route: RouteDecision,
    pub demoted: bool,
    pub references: Vec<String>,
    pub fragment_count: usize,
    pub latency: Duration,
    pub timestamp_epoch_ms: i64,
}

impl QueryLogEntry {
    /// Create a new entry with the timestamp set to now.
    pub fn new(
        request_id: impl Into<String>,
        session_id: impl Into<String>,
        route: RouteDecision,
        demoted: bool,
        references: Vec<String>,
        fragment_count: usize,
        latency: Duration,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            session_id: session_id.into(),
            route,
            demoted,
            references,
            fragment_count,
            latency,
            timestamp_epoch_ms: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Append-only query log with ring-buffer retention.
#[derive(Debug, Clone)]
pub struct QueryLog {
    entries: VecDeque<QueryLogEntry>,
    max_entries: usize,
}

impl Default for QueryLog {
    fn default() -> Self {
        Self::with_capacity(5_000)
    }
}

impl QueryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries: max_entries.max(1),
        }
    }

    pub fn record(&mut self, entry: QueryLogEntry) {
        tracing::debug!(
            event = "query_logged",
            request_id = %entry.request_id,
            route = entry.route.as_str(),
            fragments = entry.fragment_count,
            latency_ms = entry.latency.as_millis() as u64,
            "query logged"
        );
        self.entries.push_back(entry);
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &QueryLogEntry> {
        self.entries.iter()
    }

    /// Latency at the given percentile (0.0–1.0).
    pub fn latency_percentile(&self, p: f64) -> Duration {
        if self.entries.is_empty() {
            return Duration::ZERO;
        }
        let mut latencies: Vec<Duration> = self.entries.iter().map(|e| e.latency).collect();
        latencies.sort();
        let idx = ((p.clamp(0.0, 1.0) * (latencies.len() - 1) as f64).round() as usize)
            .min(latencies.len() - 1);
        latencies[idx]
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }
}
