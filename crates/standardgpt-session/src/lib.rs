//! # standardgpt-session
//!
//! Conversation memory per session id.
//! One [`ConversationMemory`] per id, never shared, created on first contact.
//! Concurrent access via `DashMap`; mutation is serialized per session only.
//!
//! ## Modules
//!
//! - `memory`: ordered turn log and its bounded textual rendering
//! - `store`: `SessionStore` keyed by session id
//! - `stats`: turn count and preview for the session boundary
//! - `cleanup`: removal of idle sessions

pub mod cleanup;
pub mod memory;
pub mod stats;
pub mod store;

pub use cleanup::cleanup_stale_sessions;
pub use memory::{ConversationMemory, RenderLimits};
pub use stats::SessionStats;
pub use store::SessionStore;
