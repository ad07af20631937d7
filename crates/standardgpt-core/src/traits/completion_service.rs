use std::future::Future;

use crate::errors::CompletionError;
use crate::prompts::CompletionRequest;

/// Receives answer text fragments as they are generated.
pub type TokenSink = dyn Fn(&str) + Send + Sync;

/// Large-language-model completion service.
pub trait ICompletionService: Send + Sync {
    /// Run one completion. Any failure is transient from the pipeline's view.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<String, CompletionError>> + Send;

    /// Like [`complete`](Self::complete), handing each fragment to
    /// `on_token` as it arrives. Returns the full text.
    ///
    /// Services without incremental output deliver the whole text as one
    /// fragment.
    fn complete_stream(
        &self,
        request: &CompletionRequest,
        on_token: &TokenSink,
    ) -> impl Future<Output = Result<String, CompletionError>> + Send {
        async move {
            let text = self.complete(request).await?;
            on_token(&text);
            Ok(text)
        }
    }

    /// Provider name for logs and health reports.
    fn name(&self) -> &str;

    /// Whether the service is configured and believed reachable.
    fn is_available(&self) -> bool;
}
