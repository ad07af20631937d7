//! [`ObservabilityEngine`]: owns metrics, degradation tracking, and the query log.

use std::time::Duration;

use standardgpt_core::errors::FailureKind;
use standardgpt_core::models::{AuditRecord, RouteDecision};

use crate::degradation::DegradationTracker;
use crate::metrics::{MetricsSnapshot, PipelineMetrics};
use crate::query_log::{QueryLog, QueryLogEntry};
use crate::tracing_setup::events;

/// Central observability state for one orchestrator.
#[derive(Debug, Default)]
pub struct ObservabilityEngine {
    pub metrics: PipelineMetrics,
    pub degradation: DegradationTracker,
    pub query_log: QueryLog,
}

impl ObservabilityEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_started(&mut self) {
        self.metrics.record_started();
    }

    /// Record an answered question with the audits it raised.
    pub fn record_answered(&mut self, entry: QueryLogEntry, audits: &[AuditRecord]) {
        self.degradation.record_all(audits.iter().cloned());
        self.metrics
            .record_answered(entry.route, entry.demoted, entry.latency);
        events::pipeline_completed(
            entry.route.as_str(),
            entry.demoted,
            entry.fragment_count,
            entry.latency.as_millis() as u64,
        );
        self.query_log.record(entry);
    }

    /// Record a question that ended in a terminal error or cancellation.
    pub fn record_failed(
        &mut self,
        kind: FailureKind,
        error: &str,
        latency: Duration,
        audits: &[AuditRecord],
    ) {
        self.degradation.record_all(audits.iter().cloned());
        self.metrics.record_failed(kind, latency);
        events::pipeline_failed(kind.as_str(), error, latency.as_millis() as u64);
    }

    /// Snapshot with cache hit rates supplied by the caches' owner.
    pub fn snapshot(&self, completion_hit_rate: f64, embedding_hit_rate: f64) -> MetricsSnapshot {
        MetricsSnapshot {
            total_queries: self.metrics.total_queries,
            answered: self.metrics.answered,
            by_route: self.metrics.by_route.clone(),
            demotions: self.metrics.demotions,
            failures: self.metrics.failures.clone(),
            cancellations: self.metrics.cancellations,
            average_latency_ms: self.metrics.average_latency().as_millis() as u64,
            completion_cache_hit_rate: completion_hit_rate,
            embedding_cache_hit_rate: embedding_hit_rate,
            audits: self
                .degradation
                .counts()
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
        }
    }

    pub fn route_count(&self, route: RouteDecision) -> u64 {
        self.metrics.route_count(route)
    }

    /// Reset all counters and logs.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
