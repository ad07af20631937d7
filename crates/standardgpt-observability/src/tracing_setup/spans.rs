//! Span definitions per pipeline stage.

/// Span wrapping one whole question.
#[macro_export]
macro_rules! pipeline_span {
    ($request_id:expr, $session_id:expr) => {
        tracing::info_span!("standardgpt.pipeline", request_id = %$request_id, session_id = %$session_id)
    };
}

/// Create a routing span.
#[macro_export]
macro_rules! routing_span {
    ($question:expr) => {
        tracing::info_span!("standardgpt.routing", question_chars = $question.chars().count())
    };
}

/// Create a retrieval span.
#[macro_export]
macro_rules! retrieval_span {
    ($route:expr) => {
        tracing::info_span!("standardgpt.retrieval", route = %$route)
    };
}

/// Create a generation span.
#[macro_export]
macro_rules! generation_span {
    ($fragments:expr) => {
        tracing::info_span!("standardgpt.generation", fragments = $fragments)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const PIPELINE: &str = "standardgpt.pipeline";
    pub const ROUTING: &str = "standardgpt.routing";
    pub const RETRIEVAL: &str = "standardgpt.retrieval";
    pub const GENERATION: &str = "standardgpt.generation";
}
