/// Query construction errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RetrievalError {
    #[error("route {route} needs at least one standard reference")]
    MissingReferences { route: String },
}
