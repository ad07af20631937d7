/// StandardGPT version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Rendered conversation memory when a session has no turns.
pub const EMPTY_MEMORY_SENTINEL: &str = "0";

/// Reference scope used by the handbook (personnel / HR policy) route.
pub const HANDBOOK_SCOPE: &str = "Personalhåndbok";

/// Field holding the document reference in the search index.
pub const REFERENCE_FIELD: &str = "reference.keyword";

/// Field holding the dense vector in the search index.
pub const VECTOR_FIELD: &str = "vector";

/// Source fields requested from the search index.
pub const SOURCE_FIELDS: [&str; 3] = ["text", "reference", "page"];

/// Fields matched by the content-only route, with boosts.
pub const CONTENT_MATCH_FIELDS: [&str; 2] = ["text^2", "reference"];

/// Answer context used when retrieval returned nothing.
pub const NO_FRAGMENTS_TEXT: &str = "Ingen relevante dokumenter funnet.";

/// Maximum number of characters shown when a cache key is listed.
pub const CACHE_KEY_PREVIEW_CHARS: usize = 8;
