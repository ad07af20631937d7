use std::future::Future;

use crate::errors::EmbeddingError;

/// Embedding provider.
pub trait IEmbeddingProvider: Send + Sync {
    /// Embed texts in one upstream call. Output order matches input order.
    fn embed_batch(
        &self,
        texts: &[String],
    ) -> impl Future<Output = Result<Vec<Vec<f32>>, EmbeddingError>> + Send;

    /// Dimensionality of every vector this provider returns.
    fn dimensions(&self) -> usize;

    fn name(&self) -> &str;

    fn is_available(&self) -> bool;
}
