//! Collaborator seams. Concrete HTTP clients live in `standardgpt-providers`;
//! scripted doubles live in `test-fixtures`.
//!
//! Methods return `impl Future + Send` so implementors can write plain
//! `async fn` while pipelines stay spawnable.

mod completion_service;
mod embedding_provider;
mod search_engine;

pub use completion_service::{ICompletionService, TokenSink};
pub use embedding_provider::IEmbeddingProvider;
pub use search_engine::ISearchEngine;

pub use crate::prompts::CompletionRequest;
