//! # standardgpt-cache
//!
//! Two independent TTL-bounded caches:
//! - [`CompletionCache`]: per-operation TTL, hard entry cap, at most one
//!   upstream computation in flight per key.
//! - [`EmbeddingCache`]: single TTL, bounded size, batched upstream calls
//!   for misses with input order preserved.
//!
//! Both sit on [`TtlTable`], a lock-protected table with O(1) critical sections.
//! [`CompletionGateway`] renders prompt records and routes every templated
//! completion call through the completion cache.

pub mod completion;
pub mod embedding;
pub mod gateway;
pub mod key;
pub mod stats;
pub mod ttl_table;

pub use completion::CompletionCache;
pub use embedding::EmbeddingCache;
pub use gateway::CompletionGateway;
pub use key::{cache_key, short_key};
pub use stats::{CacheStats, EntrySummary};
pub use ttl_table::{CacheEntry, TtlTable};
