//! Degradation and fallback tracking.

pub mod tracker;

pub use tracker::DegradationTracker;
