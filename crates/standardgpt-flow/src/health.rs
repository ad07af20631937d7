//! Collaborator availability.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub completion: bool,
    pub search: bool,
    pub embedding: bool,
    pub prompts_complete: bool,
    pub completion_service: String,
    pub search_engine: String,
    pub embedding_provider: String,
}

impl HealthReport {
    /// Search and completion are required; embedding degrades to text-only.
    pub fn is_healthy(&self) -> bool {
        self.completion && self.search && self.prompts_complete
    }

    pub fn is_degraded(&self) -> bool {
        self.is_healthy() && !self.embedding
    }
}
