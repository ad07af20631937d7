//! Prompt configuration records, one per completion operation.
//!
//! Records are built once at startup from the built-in defaults plus any
//! overrides from `[prompts.operations.<name>]` in the config file.

mod defaults;

pub use defaults::{FIELD_FRAGMENTS, FIELD_MEMORY, FIELD_QUESTION};

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::PromptOverrides;
use crate::errors::ConfigError;

/// Completion operation kinds. Each has its own prompt record and cache TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Route classification.
    Classify,
    /// Standard identifiers from the question itself.
    ExtractStandard,
    /// Standard identifiers from conversation memory.
    ExtractFromMemory,
    /// Question rewrite used for embedding.
    OptimizeSemantic,
    /// Keyword extraction used for the text match clause.
    OptimizeTextual,
    /// Grounded answer generation.
    Answer,
}

impl OperationKind {
    pub const ALL: [OperationKind; 6] = [
        Self::Classify,
        Self::ExtractStandard,
        Self::ExtractFromMemory,
        Self::OptimizeSemantic,
        Self::OptimizeTextual,
        Self::Answer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Classify => "classify",
            Self::ExtractStandard => "extract_standard",
            Self::ExtractFromMemory => "extract_from_memory",
            Self::OptimizeSemantic => "optimize_semantic",
            Self::OptimizeTextual => "optimize_textual",
            Self::Answer => "answer",
        }
    }

    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == name)
            .ok_or_else(|| ConfigError::UnknownOperation {
                name: name.to_string(),
            })
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Explicit configuration record for one operation kind.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptConfig {
    pub kind: OperationKind,
    pub system_message: String,
    /// User message body with `{field}` placeholders.
    pub template: String,
    pub required_fields: Vec<&'static str>,
    pub ttl: Duration,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// System and user messages ready to send.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructuredPrompt {
    pub system: String,
    pub user: String,
}

impl StructuredPrompt {
    /// Payload hashed into the completion cache key.
    pub fn cache_payload(&self) -> String {
        format!("{}\n{}", self.system, self.user)
    }
}

/// Named values substituted into a template.
#[derive(Debug, Clone, Default)]
pub struct PromptFields {
    values: BTreeMap<&'static str, String>,
}

impl PromptFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.values.insert(name, value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

/// Fully rendered completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub kind: OperationKind,
    pub prompt: StructuredPrompt,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Cache TTL for this operation kind.
    pub ttl: Duration,
}

/// All prompt records, keyed by operation kind.
#[derive(Debug, Clone)]
pub struct PromptRegistry {
    records: HashMap<OperationKind, PromptConfig>,
}

impl Default for PromptRegistry {
    fn default() -> Self {
        Self {
            records: OperationKind::ALL
                .into_iter()
                .map(|k| (k, defaults::builtin(k)))
                .collect(),
        }
    }
}

impl PromptRegistry {
    /// Built-in records with config overrides applied.
    pub fn from_config(overrides: &PromptOverrides) -> Result<Self, ConfigError> {
        let mut registry = Self::default();
        for (name, o) in &overrides.operations {
            let kind = OperationKind::parse(name)?;
            let record = registry
                .records
                .get_mut(&kind)
                .ok_or_else(|| ConfigError::UnknownOperation { name: name.clone() })?;
            if let Some(ttl) = o.ttl_secs {
                record.ttl = Duration::from_secs(ttl);
            }
            if let Some(max_tokens) = o.max_tokens {
                record.max_tokens = max_tokens;
            }
            if let Some(temperature) = o.temperature {
                if !(0.0..=2.0).contains(&temperature) {
                    return Err(ConfigError::InvalidValue {
                        field: format!("prompts.operations.{name}.temperature"),
                        reason: format!("{temperature} is outside 0.0..=2.0"),
                    });
                }
                record.temperature = temperature;
            }
            if let Some(system) = &o.system_message {
                record.system_message = system.clone();
            }
            if let Some(template) = &o.template {
                for field in &record.required_fields {
                    if !template.contains(&format!("{{{field}}}")) {
                        return Err(ConfigError::MissingPromptField {
                            operation: name.clone(),
                            field: (*field).to_string(),
                        });
                    }
                }
                record.template = template.clone();
            }
        }
        Ok(registry)
    }

    pub fn get(&self, kind: OperationKind) -> Option<&PromptConfig> {
        self.records.get(&kind)
    }

    /// True when every operation kind has a record.
    pub fn is_complete(&self) -> bool {
        OperationKind::ALL.iter().all(|k| self.records.contains_key(k))
    }

    /// Substitute `fields` into the record for `kind`.
    pub fn render(
        &self,
        kind: OperationKind,
        fields: &PromptFields,
    ) -> Result<CompletionRequest, ConfigError> {
        let record = self
            .records
            .get(&kind)
            .ok_or_else(|| ConfigError::UnknownOperation {
                name: kind.as_str().to_string(),
            })?;

        let mut user = record.template.clone();
        for field in &record.required_fields {
            let value = fields
                .get(field)
                .ok_or_else(|| ConfigError::MissingPromptField {
                    operation: kind.as_str().to_string(),
                    field: (*field).to_string(),
                })?;
            user = user.replace(&format!("{{{field}}}"), value);
        }

        Ok(CompletionRequest {
            kind,
            prompt: StructuredPrompt {
                system: record.system_message.clone(),
                user,
            },
            max_tokens: record.max_tokens,
            temperature: record.temperature,
            ttl: record.ttl,
        })
    }
}
