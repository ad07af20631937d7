mod cache_config;
mod completion_config;
pub mod defaults;
mod embedding_config;
mod observability_config;
mod pipeline_config;
mod prompt_overrides;
mod search_config;
mod session_config;

pub use cache_config::CacheConfig;
pub use completion_config::CompletionConfig;
pub use embedding_config::EmbeddingConfig;
pub use observability_config::ObservabilityConfig;
pub use pipeline_config::PipelineConfig;
pub use prompt_overrides::{PromptOverride, PromptOverrides};
pub use search_config::SearchConfig;
pub use session_config::SessionConfig;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Top-level configuration aggregating all subsystem configs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardGptConfig {
    pub completion: CompletionConfig,
    pub search: SearchConfig,
    pub embedding: EmbeddingConfig,
    pub cache: CacheConfig,
    pub session: SessionConfig,
    pub pipeline: PipelineConfig,
    pub prompts: PromptOverrides,
    pub observability: ObservabilityConfig,
}

impl StandardGptConfig {
    /// Parse a TOML document. Missing sections and keys take their defaults.
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw).map_err(|e| ConfigError::ParseFailed {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&raw)
    }

    /// Reject values that would make the pipeline misbehave rather than fail loudly.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.embedding.dimensions == 0 {
            return Err(invalid("embedding.dimensions", "must be greater than zero"));
        }
        if self.embedding.max_entries == 0 {
            return Err(invalid("embedding.max_entries", "must be greater than zero"));
        }
        if self.cache.max_entries == 0 {
            return Err(invalid("cache.max_entries", "must be greater than zero"));
        }
        if self.pipeline.timeout_ms == 0 {
            return Err(invalid("pipeline.timeout_ms", "must be greater than zero"));
        }
        if self.session.window_turns == 0 {
            return Err(invalid("session.window_turns", "must be greater than zero"));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
