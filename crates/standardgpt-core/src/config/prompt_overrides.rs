use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-operation overrides applied on top of the built-in prompt records.
///
/// Keyed by operation name (`classify`, `extract_standard`, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptOverrides {
    pub operations: BTreeMap<String, PromptOverride>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptOverride {
    pub ttl_secs: Option<u64>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub system_message: Option<String>,
    pub template: Option<String>,
}
