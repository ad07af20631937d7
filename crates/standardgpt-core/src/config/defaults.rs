// Single source of truth for all default values.

// --- Completion ---
pub const DEFAULT_COMPLETION_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_COMPLETION_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_COMPLETION_TIMEOUT_MS: u64 = 30_000;

// --- Search ---
pub const DEFAULT_SEARCH_URL: &str = "http://localhost:9200";
pub const DEFAULT_SEARCH_INDEX: &str = "standards";
pub const DEFAULT_SEARCH_API_KEY_ENV: &str = "ELASTICSEARCH_API_KEY";
pub const DEFAULT_SEARCH_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_REFERENCE_RESULT_SIZE: usize = 40;
pub const DEFAULT_HANDBOOK_RESULT_SIZE: usize = 80;
pub const DEFAULT_CONTENT_RESULT_SIZE: usize = 60;

// --- Embeddings ---
pub const DEFAULT_EMBEDDING_ENDPOINT: &str = "http://localhost:8080/embed";
pub const DEFAULT_EMBEDDING_API_KEY_ENV: &str = "EMBEDDING_API_KEY";
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 384;
pub const DEFAULT_EMBEDDING_TTL_SECS: u64 = 86_400; // 24 hours
pub const DEFAULT_EMBEDDING_MAX_ENTRIES: usize = 10_000;
pub const DEFAULT_EMBEDDING_TIMEOUT_MS: u64 = 10_000;

// --- Completion cache ---
pub const DEFAULT_COMPLETION_CACHE_MAX_ENTRIES: usize = 1_000;
pub const DEFAULT_CACHE_PURGE_INTERVAL_SECS: u64 = 60;

// --- Session ---
pub const DEFAULT_MEMORY_WINDOW_TURNS: usize = 5;
pub const DEFAULT_MEMORY_MAX_CHARS: usize = 4_000;
pub const DEFAULT_MEMORY_ANSWER_CHARS: usize = 600;
pub const DEFAULT_STATS_PREVIEW_CHARS: usize = 200;
pub const DEFAULT_SESSION_INACTIVITY_SECS: u64 = 3_600; // 1 hour

// --- Pipeline ---
pub const DEFAULT_PIPELINE_TIMEOUT_MS: u64 = 120_000;
pub const DEFAULT_CLASSIFICATION_TIMEOUT_MS: u64 = 8_000;
pub const DEFAULT_OPTIMIZATION_TIMEOUT_MS: u64 = 8_000;
pub const DEFAULT_MAX_CONTEXT_CHARS: usize = 15_000;

// --- Prompts (max tokens / temperature / ttl seconds) ---
pub const DEFAULT_CLASSIFY_MAX_TOKENS: u32 = 20;
pub const DEFAULT_CLASSIFY_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_CLASSIFY_TTL_SECS: u64 = 3_600;
pub const DEFAULT_EXTRACT_STANDARD_MAX_TOKENS: u32 = 100;
pub const DEFAULT_EXTRACT_STANDARD_TEMPERATURE: f32 = 0.0;
pub const DEFAULT_EXTRACT_STANDARD_TTL_SECS: u64 = 1_800;
pub const DEFAULT_EXTRACT_MEMORY_MAX_TOKENS: u32 = 100;
pub const DEFAULT_EXTRACT_MEMORY_TEMPERATURE: f32 = 0.0;
pub const DEFAULT_EXTRACT_MEMORY_TTL_SECS: u64 = 900;
pub const DEFAULT_OPTIMIZE_SEMANTIC_MAX_TOKENS: u32 = 200;
pub const DEFAULT_OPTIMIZE_SEMANTIC_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_OPTIMIZE_SEMANTIC_TTL_SECS: u64 = 1_800;
pub const DEFAULT_OPTIMIZE_TEXTUAL_MAX_TOKENS: u32 = 150;
pub const DEFAULT_OPTIMIZE_TEXTUAL_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_OPTIMIZE_TEXTUAL_TTL_SECS: u64 = 1_800;
pub const DEFAULT_ANSWER_MAX_TOKENS: u32 = 1_500;
pub const DEFAULT_ANSWER_TEMPERATURE: f32 = 0.4;
pub const DEFAULT_ANSWER_TTL_SECS: u64 = 900;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = true;
