//! Structured log events for key pipeline operations.
//!
//! Each function emits a `tracing` event with structured fields.

/// Log the route chosen for a question.
pub fn route_decided(route: &str, references: &[String], label: Option<&str>) {
    tracing::info!(
        event = "route_decided",
        route = %route,
        references = ?references,
        label = label.unwrap_or("none"),
        "route decided"
    );
}

/// Log a context-dependent route demoted to content-only.
pub fn route_demoted(from: &str, to: &str, reason: &str) {
    tracing::warn!(
        event = "route_demoted",
        from = %from,
        to = %to,
        reason = %reason,
        "route demoted"
    );
}

/// Log a classifier reply that fell outside the label set.
pub fn classification_ambiguous(detail: &str) {
    tracing::info!(
        event = "classification_ambiguous",
        detail = %detail,
        "classification fell back to content-only"
    );
}

/// Log cache evictions.
pub fn cache_evicted(cache: &str, expired: u64, capacity: u64) {
    tracing::debug!(
        event = "cache_evicted",
        cache = %cache,
        expired = expired,
        capacity = capacity,
        "cache entries evicted"
    );
}

/// Log a degradation trigger event.
pub fn degradation_triggered(component: &str, failure: &str, fallback: &str) {
    tracing::warn!(
        event = "degradation_triggered",
        component = %component,
        failure = %failure,
        fallback = %fallback,
        "degradation triggered"
    );
}

/// Log a successful pipeline run.
pub fn pipeline_completed(route: &str, demoted: bool, fragments: usize, latency_ms: u64) {
    tracing::info!(
        event = "pipeline_completed",
        route = %route,
        demoted = demoted,
        fragments = fragments,
        latency_ms = latency_ms,
        "pipeline completed"
    );
}

/// Log a pipeline that ended with a terminal error.
pub fn pipeline_failed(kind: &str, error: &str, latency_ms: u64) {
    tracing::error!(
        event = "pipeline_failed",
        kind = %kind,
        error = %error,
        latency_ms = latency_ms,
        "pipeline failed"
    );
}
