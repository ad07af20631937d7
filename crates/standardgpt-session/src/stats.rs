use chrono::{DateTime, Utc};
use serde::Serialize;

/// Session boundary view: turn count and a short preview of memory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStats {
    pub session_id: String,
    pub turn_count: usize,
    /// Bounded preview of the rendered memory, `"0"` when empty.
    pub preview: String,
    /// `None` for a session that was never seen.
    pub last_activity: Option<DateTime<Utc>>,
}

impl SessionStats {
    pub fn empty(session_id: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            turn_count: 0,
            preview: standardgpt_core::constants::EMPTY_MEMORY_SENTINEL.to_string(),
            last_activity: None,
        }
    }
}
