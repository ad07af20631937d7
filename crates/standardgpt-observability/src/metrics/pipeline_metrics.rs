//! Total queries, per-route counts, demotions, failures, and latency.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use standardgpt_core::errors::FailureKind;
use standardgpt_core::models::RouteDecision;

/// Running counters for answered and failed questions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineMetrics {
    pub total_queries: u64,
    pub answered: u64,
    /// Effective route of each answered question.
    pub by_route: BTreeMap<String, u64>,
    pub demotions: u64,
    pub failures: BTreeMap<String, u64>,
    pub cancellations: u64,
    total_latency_ms: u64,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_started(&mut self) {
        self.total_queries += 1;
    }

    pub fn record_answered(&mut self, route: RouteDecision, demoted: bool, latency: Duration) {
        self.answered += 1;
        *self.by_route.entry(route.as_str().to_string()).or_default() += 1;
        if demoted {
            self.demotions += 1;
        }
        self.total_latency_ms += latency.as_millis() as u64;
    }

    pub fn record_failed(&mut self, kind: FailureKind, latency: Duration) {
        *self.failures.entry(kind.as_str().to_string()).or_default() += 1;
        if kind == FailureKind::Cancelled {
            self.cancellations += 1;
        }
        self.total_latency_ms += latency.as_millis() as u64;
    }

    /// Mean end-to-end latency over every finished question.
    pub fn average_latency(&self) -> Duration {
        let finished = self.answered + self.failures.values().sum::<u64>();
        if finished == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(self.total_latency_ms / finished)
    }

    pub fn route_count(&self, route: RouteDecision) -> u64 {
        self.by_route.get(route.as_str()).copied().unwrap_or(0)
    }

    pub fn failure_count(&self) -> u64 {
        self.failures.values().sum()
    }
}

/// Point-in-time view handed to the stats surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub total_queries: u64,
    pub answered: u64,
    pub by_route: BTreeMap<String, u64>,
    pub demotions: u64,
    pub failures: BTreeMap<String, u64>,
    pub cancellations: u64,
    pub average_latency_ms: u64,
    pub completion_cache_hit_rate: f64,
    pub embedding_cache_hit_rate: f64,
    pub audits: BTreeMap<String, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_covers_answered_and_failed() {
        let mut m = PipelineMetrics::new();
        m.record_started();
        m.record_started();
        m.record_answered(RouteDecision::ContentOnly, true, Duration::from_millis(100));
        m.record_failed(FailureKind::UpstreamTransient, Duration::from_millis(300));
        assert_eq!(m.average_latency(), Duration::from_millis(200));
        assert_eq!(m.route_count(RouteDecision::ContentOnly), 1);
        assert_eq!(m.demotions, 1);
        assert_eq!(m.failures.get("upstream_transient"), Some(&1));
    }

    #[test]
    fn cancellations_are_counted_separately() {
        let mut m = PipelineMetrics::new();
        m.record_failed(FailureKind::Cancelled, Duration::ZERO);
        assert_eq!(m.cancellations, 1);
        assert_eq!(m.failure_count(), 1);
        assert_eq!(m.average_latency(), Duration::ZERO);
    }
}
