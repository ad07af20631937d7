//! SessionStore: concurrent per-session memory via DashMap.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use standardgpt_core::config::SessionConfig;
use standardgpt_core::models::ConversationTurn;
use standardgpt_core::text::truncate_chars;

use crate::memory::{ConversationMemory, RenderLimits};
use crate::stats::SessionStats;

/// Thread-safe session store. Cloning shares the same sessions.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<String, ConversationMemory>>,
    limits: RenderLimits,
    preview_chars: usize,
}

impl SessionStore {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            limits: config.into(),
            preview_chars: config.preview_chars,
        }
    }

    /// Register first contact. Creates an empty memory if the id is new.
    pub fn touch(&self, session_id: &str) {
        self.sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                debug!(session_id, "session created");
                ConversationMemory::new(session_id)
            })
            .touch();
    }

    /// Append a completed turn, creating the session if needed.
    pub fn append(&self, session_id: &str, turn: ConversationTurn) {
        self.sessions
            .entry(session_id.to_string())
            .or_insert_with(|| ConversationMemory::new(session_id))
            .append(turn);
    }

    /// Snapshot of all turns, oldest first. Empty for an unknown session.
    pub fn turns(&self, session_id: &str) -> Vec<ConversationTurn> {
        self.sessions
            .get(session_id)
            .map(|m| m.turns().to_vec())
            .unwrap_or_default()
    }

    /// Bounded rendering for prompts, `"0"` when empty or unknown.
    pub fn render(&self, session_id: &str) -> String {
        match self.sessions.get(session_id) {
            Some(memory) => memory.render(self.limits),
            None => ConversationMemory::new(session_id).render(self.limits),
        }
    }

    /// Empty the session's memory. Unknown ids and repeated clears are no-ops.
    pub fn clear(&self, session_id: &str) -> usize {
        let removed = self
            .sessions
            .get_mut(session_id)
            .map(|mut m| m.clear())
            .unwrap_or(0);
        debug!(session_id, removed, "session cleared");
        removed
    }

    pub fn stats(&self, session_id: &str) -> SessionStats {
        match self.sessions.get(session_id) {
            Some(memory) => SessionStats {
                session_id: session_id.to_string(),
                turn_count: memory.len(),
                preview: truncate_chars(&memory.render(self.limits), self.preview_chars),
                last_activity: Some(memory.last_activity),
            },
            None => SessionStats::empty(session_id),
        }
    }

    /// Put back a previously saved memory, replacing any live one with the same id.
    pub fn restore(&self, memory: ConversationMemory) {
        self.sessions.insert(memory.session_id.clone(), memory);
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }

    /// Drop every session idle longer than `inactivity`, checked under the
    /// shard lock so a concurrent touch either lands first or recreates the
    /// session afterwards. Returns the number removed.
    pub fn remove_idle(&self, inactivity: chrono::Duration) -> usize {
        let mut removed = 0;
        self.sessions.retain(|_, memory| {
            let keep = memory.idle_duration() <= inactivity;
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn session_ids(&self) -> Vec<String> {
        self.sessions.iter().map(|r| r.key().clone()).collect()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(&SessionConfig::default())
    }
}
