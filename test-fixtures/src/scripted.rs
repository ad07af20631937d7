//! Scripted collaborator doubles with call recording and injectable
//! failures and delays.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use standardgpt_core::errors::{CompletionError, EmbeddingError, SearchError};
use standardgpt_core::models::{QueryObject, SearchHit};
use standardgpt_core::prompts::{CompletionRequest, OperationKind};
use standardgpt_core::traits::{ICompletionService, IEmbeddingProvider, ISearchEngine, TokenSink};

type Responder = Arc<dyn Fn(&CompletionRequest) -> Result<String, CompletionError> + Send + Sync>;

/// Completion service answering from per-operation scripts.
///
/// An operation without a script fails with `Unavailable`, so tests notice
/// calls they did not expect.
#[derive(Default)]
pub struct ScriptedCompletion {
    responders: HashMap<OperationKind, Responder>,
    delays: HashMap<OperationKind, Duration>,
    calls: Mutex<Vec<CompletionRequest>>,
    in_progress: AtomicUsize,
}

impl ScriptedCompletion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, kind: OperationKind, text: impl Into<String>) -> Self {
        let text = text.into();
        self.responders
            .insert(kind, Arc::new(move |_| Ok(text.clone())));
        self
    }

    pub fn fail(mut self, kind: OperationKind, error: CompletionError) -> Self {
        self.responders
            .insert(kind, Arc::new(move |_| Err(error.clone())));
        self
    }

    pub fn respond_with<F>(mut self, kind: OperationKind, f: F) -> Self
    where
        F: Fn(&CompletionRequest) -> Result<String, CompletionError> + Send + Sync + 'static,
    {
        self.responders.insert(kind, Arc::new(f));
        self
    }

    pub fn delay(mut self, kind: OperationKind, delay: Duration) -> Self {
        self.delays.insert(kind, delay);
        self
    }

    /// Every request received, in arrival order.
    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self, kind: OperationKind) -> usize {
        self.calls().iter().filter(|r| r.kind == kind).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls().len()
    }

    /// Calls started but not yet finished. Abandoned calls stay counted.
    pub fn in_progress(&self) -> usize {
        self.in_progress.load(Ordering::SeqCst)
    }
}

impl ICompletionService for ScriptedCompletion {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request.clone());
        }
        self.in_progress.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(&request.kind) {
            tokio::time::sleep(*delay).await;
        }
        self.in_progress.fetch_sub(1, Ordering::SeqCst);
        match self.responders.get(&request.kind) {
            Some(responder) => responder(request),
            None => Err(CompletionError::Unavailable {
                reason: format!("no script for {}", request.kind),
            }),
        }
    }

    /// Fragments are the reply's words, trailing whitespace included.
    async fn complete_stream(
        &self,
        request: &CompletionRequest,
        on_token: &TokenSink,
    ) -> Result<String, CompletionError> {
        let text = self.complete(request).await?;
        for fragment in text.split_inclusive(' ') {
            on_token(fragment);
        }
        Ok(text)
    }

    fn name(&self) -> &str {
        "scripted-completion"
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Search engine returning a fixed hit list or a fixed failure.
#[derive(Default)]
pub struct ScriptedSearch {
    hits: Vec<SearchHit>,
    failure: Option<SearchError>,
    delay: Option<Duration>,
    queries: Mutex<Vec<QueryObject>>,
}

impl ScriptedSearch {
    pub fn with_hits(hits: Vec<SearchHit>) -> Self {
        Self {
            hits,
            ..Self::default()
        }
    }

    pub fn failing(error: SearchError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn queries(&self) -> Vec<QueryObject> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.queries().len()
    }
}

impl ISearchEngine for ScriptedSearch {
    async fn search(&self, query: &QueryObject) -> Result<Vec<SearchHit>, SearchError> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.clone());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(self.hits.clone()),
        }
    }

    fn name(&self) -> &str {
        "scripted-search"
    }

    fn is_available(&self) -> bool {
        self.failure.is_none()
    }
}

/// Deterministic embedder: the same text always yields the same vector.
pub struct ScriptedEmbedder {
    dimensions: usize,
    /// Length of returned vectors, normally equal to `dimensions`.
    emitted_len: usize,
    failure: Option<EmbeddingError>,
    delay: Option<Duration>,
    batches: Mutex<Vec<Vec<String>>>,
    available: AtomicBool,
}

impl ScriptedEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            emitted_len: dimensions,
            failure: None,
            delay: None,
            batches: Mutex::new(Vec::new()),
            available: AtomicBool::new(true),
        }
    }

    pub fn failing(dimensions: usize, error: EmbeddingError) -> Self {
        let mut embedder = Self::new(dimensions);
        embedder.failure = Some(error);
        embedder.available = AtomicBool::new(false);
        embedder
    }

    /// Return vectors of `len` values while advertising the configured dimensionality.
    pub fn emitting_len(mut self, len: usize) -> Self {
        self.emitted_len = len;
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// The vector this embedder produces for `text`.
    pub fn vector_for(&self, text: &str) -> Vec<f32> {
        vector_for(text, self.emitted_len)
    }

    /// Every upstream batch received, in order.
    pub fn batches(&self) -> Vec<Vec<String>> {
        self.batches.lock().map(|b| b.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.batches().len()
    }
}

impl IEmbeddingProvider for ScriptedEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if let Ok(mut batches) = self.batches.lock() {
            batches.push(texts.to_vec());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        Ok(texts
            .iter()
            .map(|t| vector_for(t, self.emitted_len))
            .collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "scripted-embedder"
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }
}

fn vector_for(text: &str, len: usize) -> Vec<f32> {
    // FNV-1a seed, then a simple per-dimension walk. Never all zeros.
    let mut seed: u64 = 0xcbf2_9ce4_8422_2325;
    for b in text.bytes() {
        seed ^= u64::from(b);
        seed = seed.wrapping_mul(0x0100_0000_01b3);
    }
    (0..len)
        .map(|i| {
            let mixed = seed.wrapping_add(i as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15);
            ((mixed >> 40) % 1000) as f32 / 1000.0 + 0.001
        })
        .collect()
}

/// A search hit with the given reference and text.
pub fn sample_hit(reference: &str, text: &str, score: f64) -> SearchHit {
    SearchHit {
        text: text.to_string(),
        score,
        reference: reference.to_string(),
        page: Some("1".to_string()),
    }
}
