mod cache_error;
mod completion_error;
mod config_error;
mod embedding_error;
mod retrieval_error;
mod search_error;
mod standardgpt_error;

pub use cache_error::CacheError;
pub use completion_error::CompletionError;
pub use config_error::ConfigError;
pub use embedding_error::EmbeddingError;
pub use retrieval_error::RetrievalError;
pub use search_error::SearchError;
pub use standardgpt_error::{FailureKind, StandardGptError};

/// Convenience result alias used across the workspace.
pub type StandardGptResult<T> = Result<T, StandardGptError>;
