//! Batch embedding service client.
//!
//! Request: `{"text": [...]}`. The response may carry the vectors under
//! `vectors`, `embeddings`, or (single input) `embedding`/`vector`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use standardgpt_core::config::EmbeddingConfig;
use standardgpt_core::errors::EmbeddingError;
use standardgpt_core::traits::IEmbeddingProvider;

use crate::http;

pub struct HttpEmbedder {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    dimensions: usize,
    timeout: Duration,
    /// Cleared on transport failure, restored on the next success.
    available: AtomicBool,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    text: &'a [String],
}

impl HttpEmbedder {
    pub fn new(config: &EmbeddingConfig) -> Self {
        let timeout = Duration::from_millis(config.timeout_ms);
        Self {
            client: http::client(timeout),
            endpoint: config.endpoint.clone(),
            api_key: http::api_key(&config.api_key_env),
            dimensions: config.dimensions,
            timeout,
            available: AtomicBool::new(true),
        }
    }
}

impl IEmbeddingProvider for HttpEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&EmbedRequest { text: texts });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            self.available.store(false, Ordering::Relaxed);
            warn!(error = %e, endpoint = %self.endpoint, "embedding service unreachable");
            if e.is_timeout() {
                EmbeddingError::Timeout {
                    timeout_ms: self.timeout.as_millis() as u64,
                }
            } else {
                EmbeddingError::ProviderUnavailable {
                    provider: self.endpoint.clone(),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(EmbeddingError::InferenceFailed {
                reason: format!("status {}: {}", status, http::error_body(response).await),
            });
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: e.to_string(),
            })?;
        self.available.store(true, Ordering::Relaxed);

        let vectors = parse_vectors(&value)?;
        if vectors.len() != texts.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: texts.len(),
                actual: vectors.len(),
            });
        }
        if let Some(bad) = vectors.iter().find(|v| v.len() != self.dimensions) {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimensions,
                actual: bad.len(),
            });
        }
        debug!(count = vectors.len(), "embedded batch");
        Ok(vectors)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "http-embedder"
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::Relaxed)
    }
}

/// Vectors from any of the accepted response shapes.
pub fn parse_vectors(value: &Value) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    let batch = value
        .get("vectors")
        .or_else(|| value.get("embeddings"))
        .and_then(Value::as_array);
    if let Some(rows) = batch {
        return rows.iter().map(parse_row).collect();
    }

    let single = value.get("embedding").or_else(|| value.get("vector"));
    match single {
        Some(row) => Ok(vec![parse_row(row)?]),
        None => Err(EmbeddingError::InferenceFailed {
            reason: "response has no vectors".to_string(),
        }),
    }
}

fn parse_row(row: &Value) -> Result<Vec<f32>, EmbeddingError> {
    let invalid = || EmbeddingError::InferenceFailed {
        reason: "vector is not an array of numbers".to_string(),
    };
    row.as_array()
        .ok_or_else(invalid)?
        .iter()
        .map(|x| x.as_f64().map(|f| f as f32).ok_or_else(invalid))
        .collect()
}
