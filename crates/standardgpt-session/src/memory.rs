//! ConversationMemory: append-only turn log for one session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use standardgpt_core::config::SessionConfig;
use standardgpt_core::constants::EMPTY_MEMORY_SENTINEL;
use standardgpt_core::models::ConversationTurn;
use standardgpt_core::text::{char_len, truncate_chars};

/// Bounds applied when memory is rendered into a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderLimits {
    pub window_turns: usize,
    pub max_chars: usize,
    pub answer_chars: usize,
}

impl From<&SessionConfig> for RenderLimits {
    fn from(config: &SessionConfig) -> Self {
        Self {
            window_turns: config.window_turns,
            max_chars: config.max_rendered_chars,
            answer_chars: config.answer_chars,
        }
    }
}

impl Default for RenderLimits {
    fn default() -> Self {
        (&SessionConfig::default()).into()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMemory {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    turns: Vec<ConversationTurn>,
}

impl ConversationMemory {
    pub fn new(session_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            created_at: now,
            last_activity: now,
            turns: Vec::new(),
        }
    }

    pub fn append(&mut self, turn: ConversationTurn) {
        self.last_activity = Utc::now();
        self.turns.push(turn);
    }

    /// Empty the turn log. Returns how many turns were removed.
    pub fn clear(&mut self) -> usize {
        self.last_activity = Utc::now();
        let removed = self.turns.len();
        self.turns.clear();
        removed
    }

    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn idle_duration(&self) -> chrono::Duration {
        Utc::now() - self.last_activity
    }

    /// Bounded text rendering, oldest shown turn first.
    ///
    /// Only the last `window_turns` turns are considered, each answer is cut
    /// to `answer_chars`, and older turns are dropped until the whole text
    /// fits `max_chars`. Empty memory renders as the `"0"` sentinel.
    pub fn render(&self, limits: RenderLimits) -> String {
        let start = self.turns.len().saturating_sub(limits.window_turns);
        let mut blocks: Vec<String> = self.turns[start..]
            .iter()
            .map(|t| {
                format!(
                    "Bruker: {}\nAssistent: {}",
                    t.question.trim(),
                    truncate_chars(t.answer.trim(), limits.answer_chars)
                )
            })
            .collect();

        while blocks.len() > 1 && rendered_len(&blocks) > limits.max_chars {
            blocks.remove(0);
        }

        if blocks.is_empty() {
            return EMPTY_MEMORY_SENTINEL.to_string();
        }
        let text = blocks.join("\n\n");
        if char_len(&text) > limits.max_chars {
            truncate_chars(&text, limits.max_chars)
        } else {
            text
        }
    }
}

fn rendered_len(blocks: &[String]) -> usize {
    blocks.iter().map(|b| char_len(b)).sum::<usize>() + 2 * blocks.len().saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_with(n: usize) -> ConversationMemory {
        let mut m = ConversationMemory::new("s");
        for i in 0..n {
            m.append(ConversationTurn::new(format!("q{i}"), format!("a{i}")));
        }
        m
    }

    #[test]
    fn empty_memory_renders_sentinel() {
        assert_eq!(ConversationMemory::new("s").render(RenderLimits::default()), "0");
    }

    #[test]
    fn render_keeps_window_in_order() {
        let m = memory_with(7);
        let text = m.render(RenderLimits::default());
        assert!(!text.contains("q1\n"));
        assert!(text.starts_with("Bruker: q2"));
        assert!(text.ends_with("Assistent: a6"));
    }

    #[test]
    fn long_answers_are_cut() {
        let mut m = ConversationMemory::new("s");
        m.append(ConversationTurn::new("q", "x".repeat(2_000)));
        let limits = RenderLimits {
            answer_chars: 100,
            ..RenderLimits::default()
        };
        let text = m.render(limits);
        assert!(char_len(&text) < 200);
        assert!(text.ends_with("..."));
    }

    #[test]
    fn total_bound_drops_oldest_turns_first() {
        let mut m = ConversationMemory::new("s");
        m.append(ConversationTurn::new("first", "y".repeat(300)));
        m.append(ConversationTurn::new("second", "z".repeat(300)));
        let limits = RenderLimits {
            window_turns: 5,
            max_chars: 400,
            answer_chars: 600,
        };
        let text = m.render(limits);
        assert!(!text.contains("first"));
        assert!(text.contains("second"));
        assert!(char_len(&text) <= 400);
    }

    #[test]
    fn clear_reports_removed_turns() {
        let mut m = memory_with(3);
        assert_eq!(m.clear(), 3);
        assert_eq!(m.clear(), 0);
        assert!(m.is_empty());
    }
}
