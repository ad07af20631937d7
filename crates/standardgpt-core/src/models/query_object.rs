use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::constants::{REFERENCE_FIELD, SOURCE_FIELDS, VECTOR_FIELD};

use super::StandardReference;

/// Retrieval request handed to the search engine, one variant per route shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum QueryObject {
    /// Any of the given identifiers, optionally ranked by vector similarity.
    ReferenceFiltered {
        references: Vec<StandardReference>,
        vector: Option<Vec<f32>>,
        size: usize,
    },
    /// Documents whose reference contains `scope`.
    Handbook {
        scope: String,
        vector: Option<Vec<f32>>,
        size: usize,
    },
    /// Multi-field text match.
    ContentOnly {
        match_text: String,
        fields: Vec<String>,
        vector: Option<Vec<f32>>,
        size: usize,
    },
}

impl QueryObject {
    pub fn vector(&self) -> Option<&[f32]> {
        match self {
            Self::ReferenceFiltered { vector, .. }
            | Self::Handbook { vector, .. }
            | Self::ContentOnly { vector, .. } => vector.as_deref(),
        }
    }

    pub fn size(&self) -> usize {
        match self {
            Self::ReferenceFiltered { size, .. }
            | Self::Handbook { size, .. }
            | Self::ContentOnly { size, .. } => *size,
        }
    }

    pub fn references(&self) -> &[StandardReference] {
        match self {
            Self::ReferenceFiltered { references, .. } => references,
            _ => &[],
        }
    }

    /// Elasticsearch `_search` request body.
    pub fn to_search_body(&self) -> Value {
        let base = match self {
            Self::ReferenceFiltered { references, .. } => {
                let should: Vec<Value> = references
                    .iter()
                    .map(|r| wildcard(&format!("*{}*", r.as_str())))
                    .collect();
                json!({ "bool": { "should": should, "minimum_should_match": 1 } })
            }
            Self::Handbook { scope, .. } => {
                json!({ "bool": { "filter": [wildcard(&format!("*{scope}*"))] } })
            }
            Self::ContentOnly {
                match_text, fields, ..
            } => json!({ "multi_match": { "query": match_text, "fields": fields } }),
        };

        let query = match self.vector().filter(|v| v.iter().any(|x| *x != 0.0)) {
            Some(vector) => json!({
                "script_score": {
                    "query": base,
                    "script": {
                        "source": format!("cosineSimilarity(params.query_vector, '{VECTOR_FIELD}') + 1.0"),
                        "params": { "query_vector": vector }
                    }
                }
            }),
            None => base,
        };

        json!({
            "size": self.size(),
            "query": query,
            "_source": SOURCE_FIELDS,
        })
    }
}

fn wildcard(pattern: &str) -> Value {
    json!({
        "wildcard": {
            REFERENCE_FIELD: { "value": pattern, "case_insensitive": true }
        }
    })
}
