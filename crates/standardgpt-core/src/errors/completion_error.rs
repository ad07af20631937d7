/// Completion service errors.
///
/// `Clone` because one in-flight completion result is shared with every
/// coalesced caller waiting on the same cache key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompletionError {
    #[error("completion service unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("completion request rejected with status {status}: {reason}")]
    Rejected { status: u16, reason: String },

    #[error("completion for {operation} timed out after {timeout_ms} ms")]
    Timeout { operation: String, timeout_ms: u64 },

    #[error("completion returned an empty or malformed body: {reason}")]
    MalformedResponse { reason: String },
}
