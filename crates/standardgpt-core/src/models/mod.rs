mod audit;
mod query_object;
mod reference;
mod route;
mod search_hit;
mod turn;

pub use audit::{AuditKind, AuditRecord};
pub use query_object::QueryObject;
pub use reference::StandardReference;
pub use route::RouteDecision;
pub use search_hit::SearchHit;
pub use turn::ConversationTurn;

/// Fixed-dimensionality embedding vector.
pub type EmbeddingVector = Vec<f32>;
