//! Elasticsearch `_search` client.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use standardgpt_core::config::SearchConfig;
use standardgpt_core::errors::SearchError;
use standardgpt_core::models::{QueryObject, SearchHit};
use standardgpt_core::traits::ISearchEngine;

use crate::http;

pub struct ElasticsearchSearch {
    client: reqwest::Client,
    search_url: String,
    /// Sent verbatim as the `Authorization` header (`ApiKey ...`).
    authorization: Option<String>,
    timeout: Duration,
    available: AtomicBool,
}

impl ElasticsearchSearch {
    pub fn new(config: &SearchConfig) -> Self {
        let timeout = Duration::from_millis(config.timeout_ms);
        Self {
            client: http::client(timeout),
            search_url: format!(
                "{}/{}/_search",
                config.url.trim_end_matches('/'),
                config.index
            ),
            authorization: http::api_key(&config.api_key_env),
            timeout,
            available: AtomicBool::new(true),
        }
    }

    pub fn search_url(&self) -> &str {
        &self.search_url
    }
}

impl ISearchEngine for ElasticsearchSearch {
    async fn search(&self, query: &QueryObject) -> Result<Vec<SearchHit>, SearchError> {
        let mut request = self.client.post(&self.search_url).json(&query.to_search_body());
        if let Some(auth) = &self.authorization {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_connect() {
                self.available.store(false, Ordering::Relaxed);
            }
            if e.is_timeout() {
                SearchError::Timeout {
                    timeout_ms: self.timeout.as_millis() as u64,
                }
            } else {
                SearchError::Unavailable {
                    reason: e.to_string(),
                }
            }
        })?;

        self.available.store(true, Ordering::Relaxed);
        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Rejected {
                status: status.as_u16(),
                reason: http::error_body(response).await,
            });
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| SearchError::InvalidResponse {
                reason: e.to_string(),
            })?;
        let hits = parse_search_hits(&value)?;
        debug!(hits = hits.len(), size = query.size(), "search completed");
        Ok(hits)
    }

    fn name(&self) -> &str {
        "elasticsearch"
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::Relaxed)
    }
}

/// Hits in engine order. Entries without text are skipped; a numeric page
/// is kept as its decimal string.
pub fn parse_search_hits(value: &Value) -> Result<Vec<SearchHit>, SearchError> {
    let hits = value
        .pointer("/hits/hits")
        .and_then(Value::as_array)
        .ok_or_else(|| SearchError::InvalidResponse {
            reason: "missing hits.hits array".to_string(),
        })?;

    Ok(hits
        .iter()
        .filter_map(|hit| {
            let source = hit.get("_source")?;
            let text = source.get("text")?.as_str()?.to_string();
            Some(SearchHit {
                text,
                score: hit.get("_score").and_then(Value::as_f64).unwrap_or(0.0),
                reference: source
                    .get("reference")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                page: source.get("page").and_then(page_string),
            })
        })
        .collect())
}

fn page_string(page: &Value) -> Option<String> {
    match page {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
