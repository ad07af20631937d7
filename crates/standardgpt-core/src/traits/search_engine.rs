use std::future::Future;

use crate::errors::SearchError;
use crate::models::{QueryObject, SearchHit};

/// Document search engine.
pub trait ISearchEngine: Send + Sync {
    /// Execute `query`, returning hits in engine rank order.
    fn search(
        &self,
        query: &QueryObject,
    ) -> impl Future<Output = Result<Vec<SearchHit>, SearchError>> + Send;

    fn name(&self) -> &str;

    fn is_available(&self) -> bool;
}
