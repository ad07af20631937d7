//! Cached, deadline-bounded completion calls.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use standardgpt_core::errors::{CompletionError, StandardGptError};
use standardgpt_core::prompts::{OperationKind, PromptFields, PromptRegistry};
use standardgpt_core::traits::{ICompletionService, TokenSink};

use crate::completion::CompletionCache;

/// Renders a prompt record, then serves it through the completion cache.
///
/// Every templated call in the pipeline goes through here, so identical
/// `(operation, rendered prompt)` pairs hit the upstream service at most once
/// per TTL window.
pub struct CompletionGateway<C> {
    service: Arc<C>,
    cache: Arc<CompletionCache>,
    prompts: Arc<PromptRegistry>,
}

impl<C> Clone for CompletionGateway<C> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            cache: Arc::clone(&self.cache),
            prompts: Arc::clone(&self.prompts),
        }
    }
}

impl<C: ICompletionService> CompletionGateway<C> {
    pub fn new(service: Arc<C>, cache: Arc<CompletionCache>, prompts: Arc<PromptRegistry>) -> Self {
        Self {
            service,
            cache,
            prompts,
        }
    }

    /// Run `kind` with `fields`. With a `deadline`, a slow call fails with
    /// [`CompletionError::Timeout`] instead of waiting.
    pub async fn call(
        &self,
        kind: OperationKind,
        fields: &PromptFields,
        deadline: Option<Duration>,
    ) -> Result<String, StandardGptError> {
        self.dispatch(kind, fields, deadline, None).await
    }

    /// Like [`call`](Self::call), handing answer fragments to `on_token`.
    ///
    /// Only the caller that computes the value sees incremental fragments.
    /// A cache hit or a coalesced wait delivers the full text as one.
    pub async fn call_streaming(
        &self,
        kind: OperationKind,
        fields: &PromptFields,
        deadline: Option<Duration>,
        on_token: &TokenSink,
    ) -> Result<String, StandardGptError> {
        self.dispatch(kind, fields, deadline, Some(on_token)).await
    }

    async fn dispatch(
        &self,
        kind: OperationKind,
        fields: &PromptFields,
        deadline: Option<Duration>,
        on_token: Option<&TokenSink>,
    ) -> Result<String, StandardGptError> {
        let request = self.prompts.render(kind, fields)?;
        let payload = request.prompt.cache_payload();
        let ttl = request.ttl;
        let streamed = AtomicBool::new(false);

        let lookup = self.cache.get_or_compute(kind, &payload, ttl, || async {
            let text = match on_token {
                Some(sink) => {
                    streamed.store(true, Ordering::Relaxed);
                    self.service.complete_stream(&request, sink).await?
                }
                None => self.service.complete(&request).await?,
            };
            let text = text.trim().to_string();
            if text.is_empty() {
                return Err(CompletionError::MalformedResponse {
                    reason: "empty completion".to_string(),
                });
            }
            Ok(text)
        });

        let result = match deadline {
            Some(limit) => match tokio::time::timeout(limit, lookup).await {
                Ok(result) => result,
                Err(_) => {
                    debug!(kind = kind.as_str(), timeout_ms = limit.as_millis() as u64, "completion deadline hit");
                    Err(CompletionError::Timeout {
                        operation: kind.as_str().to_string(),
                        timeout_ms: limit.as_millis() as u64,
                    })
                }
            },
            None => lookup.await,
        };
        let text = result?;
        if let Some(sink) = on_token {
            if !streamed.load(Ordering::Relaxed) {
                sink(&text);
            }
        }
        Ok(text)
    }

    pub fn cache(&self) -> &CompletionCache {
        &self.cache
    }

    pub fn prompts(&self) -> &PromptRegistry {
        &self.prompts
    }

    pub fn service(&self) -> &C {
        &self.service
    }
}
