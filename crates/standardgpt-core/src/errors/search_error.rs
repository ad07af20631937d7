/// Search engine errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("search engine unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("search timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    #[error("search engine returned status {status}: {reason}")]
    Rejected { status: u16, reason: String },

    #[error("search response could not be parsed: {reason}")]
    InvalidResponse { reason: String },
}
