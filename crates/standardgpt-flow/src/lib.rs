//! # standardgpt-flow
//!
//! The [`Orchestrator`] drives one question at a time through
//! route → resolve memory → optimize → embed → search → answer, emitting
//! [`ProgressEvent`]s along the way and ending every request with exactly one
//! terminal event.

pub mod health;
pub mod orchestrator;
pub mod progress;
pub mod stats;

mod pipeline;

pub use health::HealthReport;
pub use orchestrator::Orchestrator;
pub use progress::{Answer, ProgressEvent, Stage};
pub use stats::OrchestratorStats;
