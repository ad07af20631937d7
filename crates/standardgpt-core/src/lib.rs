//! # standardgpt-core
//!
//! Foundation crate for StandardGPT.
//! Defines the data model, collaborator traits, errors, prompt records, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod prompts;
pub mod text;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::StandardGptConfig;
pub use errors::{FailureKind, StandardGptError, StandardGptResult};
pub use models::{
    AuditKind, AuditRecord, ConversationTurn, EmbeddingVector, QueryObject, RouteDecision,
    SearchHit, StandardReference,
};
pub use prompts::{
    CompletionRequest, OperationKind, PromptConfig, PromptFields, PromptRegistry, StructuredPrompt,
};
pub use traits::{ICompletionService, IEmbeddingProvider, ISearchEngine};
