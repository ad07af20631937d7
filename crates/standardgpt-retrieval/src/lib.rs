//! # standardgpt-retrieval
//!
//! Everything between a route decision and the answer prompt:
//! - [`build_query`]: route + references + text + vector → [`QueryObject`]
//! - [`QueryOptimizer`]: cached rewrite calls with raw-question fallback
//! - [`format_fragments`]: search hits → bounded answer context
//!
//! [`QueryObject`]: standardgpt_core::models::QueryObject

pub mod builder;
pub mod context;
pub mod optimization;

pub use builder::build_query;
pub use context::{format_fragments, FormattedContext};
pub use optimization::{OptimizedQuery, QueryOptimizer};
