use serde::{Deserialize, Serialize};

use super::defaults;

/// Conversation memory configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Number of most recent turns rendered into prompts.
    pub window_turns: usize,
    /// Upper bound on the rendered memory text.
    pub max_rendered_chars: usize,
    /// Each stored answer is cut to this many characters when rendered.
    pub answer_chars: usize,
    pub preview_chars: usize,
    /// Sessions idle longer than this are removed by stale cleanup.
    pub inactivity_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            window_turns: defaults::DEFAULT_MEMORY_WINDOW_TURNS,
            max_rendered_chars: defaults::DEFAULT_MEMORY_MAX_CHARS,
            answer_chars: defaults::DEFAULT_MEMORY_ANSWER_CHARS,
            preview_chars: defaults::DEFAULT_STATS_PREVIEW_CHARS,
            inactivity_secs: defaults::DEFAULT_SESSION_INACTIVITY_SECS,
        }
    }
}
