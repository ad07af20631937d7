use serde::{Deserialize, Serialize};

/// One fragment returned by the search engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub text: String,
    pub score: f64,
    /// Source document identifier.
    pub reference: String,
    pub page: Option<String>,
}
