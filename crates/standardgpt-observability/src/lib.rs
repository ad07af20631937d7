//! # standardgpt-observability
//!
//! Structured tracing with span definitions and event functions, per-request
//! audit tracking (classification fallbacks, demotions, degraded embeddings),
//! pipeline counters, and a bounded query log.

pub mod degradation;
pub mod engine;
pub mod metrics;
pub mod query_log;
pub mod tracing_setup;

pub use degradation::DegradationTracker;
pub use engine::ObservabilityEngine;
pub use metrics::{MetricsSnapshot, PipelineMetrics};
pub use query_log::{QueryLog, QueryLogEntry};
