use std::time::Duration;

use standardgpt_core::errors::FailureKind;
use standardgpt_core::models::{AuditKind, AuditRecord, RouteDecision};
use standardgpt_observability::{ObservabilityEngine, QueryLogEntry};

fn answered(route: RouteDecision, demoted: bool, ms: u64) -> QueryLogEntry {
    QueryLogEntry::new("req", "s1", route, demoted, vec![], 3, Duration::from_millis(ms))
}

#[test]
fn snapshot_aggregates_routes_failures_and_audits() {
    let mut engine = ObservabilityEngine::new();
    for _ in 0..3 {
        engine.record_started();
    }
    engine.record_answered(
        answered(RouteDecision::ContentOnly, true, 100),
        &[AuditRecord::new(AuditKind::MemoryResolutionEmpty, "flow", "no references")],
    );
    engine.record_answered(answered(RouteDecision::ReferenceFiltered, false, 200), &[]);
    engine.record_failed(FailureKind::UpstreamTransient, "search down", Duration::from_millis(300), &[]);

    let snap = engine.snapshot(0.5, 0.25);
    assert_eq!(snap.total_queries, 3);
    assert_eq!(snap.answered, 2);
    assert_eq!(snap.demotions, 1);
    assert_eq!(snap.by_route.get("content_only"), Some(&1));
    assert_eq!(snap.by_route.get("reference_filtered"), Some(&1));
    assert_eq!(snap.failures.get("upstream_transient"), Some(&1));
    assert_eq!(snap.audits.get("memory_resolution_empty"), Some(&1));
    assert_eq!(snap.average_latency_ms, 200);
    assert_eq!(snap.completion_cache_hit_rate, 0.5);
    assert_eq!(engine.query_log.count(), 2);
}

#[test]
fn reset_clears_everything() {
    let mut engine = ObservabilityEngine::new();
    engine.record_started();
    engine.record_answered(answered(RouteDecision::Handbook, false, 10), &[]);
    engine.reset();
    assert_eq!(engine.metrics.total_queries, 0);
    assert_eq!(engine.query_log.count(), 0);
    assert_eq!(engine.route_count(RouteDecision::Handbook), 0);
}

#[test]
fn snapshot_serializes() {
    let engine = ObservabilityEngine::new();
    let json = serde_json::to_value(engine.snapshot(0.0, 0.0)).unwrap();
    assert_eq!(json["total_queries"], 0);
}
