//! # standardgpt-providers
//!
//! Concrete network collaborators behind the core traits:
//! - [`OpenAiCompletion`]: `ICompletionService` over an OpenAI-compatible chat endpoint
//! - [`ElasticsearchSearch`]: `ISearchEngine` over `/{index}/_search`
//! - [`HttpEmbedder`]: `IEmbeddingProvider` over a batch embedding endpoint
//!
//! Response parsing lives in plain functions so it is testable without a server.

pub mod elasticsearch;
pub mod embedding;
pub mod openai;

mod http;

pub use elasticsearch::ElasticsearchSearch;
pub use embedding::HttpEmbedder;
pub use openai::OpenAiCompletion;
