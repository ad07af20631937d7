//! Orchestrator: composes routing, retrieval, and generation per question.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{info, Instrument};
use uuid::Uuid;

use standardgpt_cache::{CompletionCache, CompletionGateway, EmbeddingCache, EntrySummary};
use standardgpt_core::config::{SearchConfig, StandardGptConfig};
use standardgpt_core::errors::{ConfigError, StandardGptError, StandardGptResult};
use standardgpt_core::models::ConversationTurn;
use standardgpt_core::prompts::PromptRegistry;
use standardgpt_core::traits::{ICompletionService, IEmbeddingProvider, ISearchEngine};
use standardgpt_observability::{ObservabilityEngine, QueryLogEntry};
use standardgpt_retrieval::QueryOptimizer;
use standardgpt_routing::{MemoryResolver, Router};
use standardgpt_session::{cleanup_stale_sessions, SessionStats, SessionStore};

use crate::health::HealthReport;
use crate::progress::{Answer, ProgressEmitter, ProgressEvent};
use crate::stats::OrchestratorStats;

/// End-to-end question pipeline over injected collaborators.
///
/// All shared state (both caches, the session store, the counters) is owned
/// here and safe to use from many concurrent `ask` calls.
pub struct Orchestrator<C, S, E> {
    pub(crate) completion: Arc<C>,
    pub(crate) search: Arc<S>,
    pub(crate) embedder: Arc<E>,
    pub(crate) gateway: CompletionGateway<C>,
    pub(crate) router: Router<C>,
    pub(crate) resolver: MemoryResolver<C>,
    pub(crate) optimizer: QueryOptimizer<C>,
    pub(crate) embeddings: Arc<EmbeddingCache>,
    pub(crate) sessions: SessionStore,
    pub(crate) search_config: SearchConfig,
    pub(crate) search_timeout: Duration,
    pub(crate) answer_timeout: Duration,
    pub(crate) max_context_chars: usize,
    pipeline_timeout: Duration,
    session_inactivity: chrono::Duration,
    observability: Mutex<ObservabilityEngine>,
}

impl<C, S, E> Orchestrator<C, S, E>
where
    C: ICompletionService,
    S: ISearchEngine,
    E: IEmbeddingProvider,
{
    /// Build every component from `config`. Fails on invalid config, bad
    /// prompt overrides, or an embedder whose dimensionality disagrees with
    /// the configured one.
    pub fn new(
        config: &StandardGptConfig,
        completion: C,
        search: S,
        embedder: E,
    ) -> StandardGptResult<Self> {
        config.validate()?;
        if embedder.dimensions() != config.embedding.dimensions {
            return Err(ConfigError::InvalidValue {
                field: "embedding.dimensions".to_string(),
                reason: format!(
                    "provider {} produces {} dimensions, config says {}",
                    embedder.name(),
                    embedder.dimensions(),
                    config.embedding.dimensions
                ),
            }
            .into());
        }

        let prompts = Arc::new(PromptRegistry::from_config(&config.prompts)?);
        let purge_interval = Duration::from_secs(config.cache.purge_interval_secs);
        let completion = Arc::new(completion);
        let gateway = CompletionGateway::new(
            Arc::clone(&completion),
            Arc::new(CompletionCache::new(config.cache.max_entries, purge_interval)),
            prompts,
        );
        let embeddings = Arc::new(EmbeddingCache::new(
            config.embedding.dimensions,
            Duration::from_secs(config.embedding.ttl_secs),
            config.embedding.max_entries,
            purge_interval,
        ));

        let pipeline = &config.pipeline;
        let classification_timeout = Duration::from_millis(pipeline.classification_timeout_ms);
        let optimization_timeout = Duration::from_millis(pipeline.optimization_timeout_ms);

        info!(
            completion = completion.name(),
            search = search.name(),
            embedder = embedder.name(),
            "orchestrator ready"
        );

        Ok(Self {
            router: Router::new(gateway.clone(), classification_timeout),
            resolver: MemoryResolver::new(gateway.clone(), classification_timeout),
            optimizer: QueryOptimizer::new(gateway.clone(), optimization_timeout),
            gateway,
            completion,
            search: Arc::new(search),
            embedder: Arc::new(embedder),
            embeddings,
            sessions: SessionStore::new(&config.session),
            search_config: config.search.clone(),
            search_timeout: Duration::from_millis(config.search.timeout_ms),
            answer_timeout: Duration::from_millis(config.completion.timeout_ms),
            max_context_chars: pipeline.max_context_chars,
            pipeline_timeout: Duration::from_millis(pipeline.timeout_ms),
            session_inactivity: chrono::Duration::seconds(
                i64::try_from(config.session.inactivity_secs).unwrap_or(i64::MAX),
            ),
            observability: Mutex::new(ObservabilityEngine::new()),
        })
    }

    /// Answer `question` for `session_id`, streaming progress into `progress`.
    ///
    /// Exactly one terminal event (final answer or error) is sent unless the
    /// receiver was dropped, in which case in-flight upstream calls are
    /// abandoned. Answer text streams as token events before the final
    /// answer. The turn is appended only after the final answer was
    /// delivered.
    pub async fn ask(
        &self,
        session_id: &str,
        question: &str,
        progress: mpsc::Sender<ProgressEvent>,
    ) -> StandardGptResult<Answer> {
        let started = Instant::now();
        let request_id = Uuid::new_v4().to_string();
        let emitter = ProgressEmitter::new(progress);
        self.sessions.touch(session_id);
        self.observe(|o| o.record_started());

        let span = standardgpt_observability::pipeline_span!(request_id, session_id);
        let mut audits = Vec::new();
        let pipeline = self
            .run(&request_id, session_id, question, &emitter, &mut audits)
            .instrument(span);

        let result = tokio::select! {
            biased;
            _ = emitter.closed() => Err(StandardGptError::Cancelled),
            outcome = tokio::time::timeout(self.pipeline_timeout, pipeline) => match outcome {
                Ok(result) => result,
                Err(_) => Err(StandardGptError::PipelineTimeout {
                    timeout_ms: self.pipeline_timeout.as_millis() as u64,
                }),
            },
        };
        let latency = started.elapsed();

        match result {
            Ok(mut answer) => {
                answer.latency = latency;
                answer.audits = audits;
                if !emitter.finish(ProgressEvent::FinalAnswer(answer.clone())).await {
                    self.record_failure(&StandardGptError::Cancelled, latency, &answer);
                    return Err(StandardGptError::Cancelled);
                }
                self.sessions
                    .append(session_id, ConversationTurn::new(question, answer.text.clone()));
                let entry = QueryLogEntry::new(
                    answer.request_id.clone(),
                    session_id,
                    answer.effective_route,
                    answer.demoted,
                    answer.references.clone(),
                    answer.fragment_count,
                    latency,
                );
                self.observe(|o| o.record_answered(entry, &answer.audits));
                Ok(answer)
            }
            Err(error) => {
                let kind = error.failure_kind();
                self.observe(|o| o.record_failed(kind, &error.to_string(), latency, &audits));
                if !matches!(error, StandardGptError::Cancelled) {
                    emitter
                        .finish(ProgressEvent::Error {
                            kind,
                            message: kind.user_message().to_string(),
                        })
                        .await;
                }
                Err(error)
            }
        }
    }

    fn record_failure(&self, error: &StandardGptError, latency: Duration, answer: &Answer) {
        let kind = error.failure_kind();
        self.observe(|o| o.record_failed(kind, &error.to_string(), latency, &answer.audits));
    }

    fn observe<R>(&self, f: impl FnOnce(&mut ObservabilityEngine) -> R) -> R {
        let mut engine = self
            .observability
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut engine)
    }

    /// Empty a session's memory. Unknown or already-empty sessions are a no-op.
    pub fn clear_session(&self, session_id: &str) -> usize {
        self.sessions.clear(session_id)
    }

    pub fn session_stats(&self, session_id: &str) -> SessionStats {
        self.sessions.stats(session_id)
    }

    /// Drop sessions idle past the configured inactivity window.
    pub fn cleanup_sessions(&self) -> usize {
        cleanup_stale_sessions(&self.sessions, self.session_inactivity)
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Aggregate counters plus both caches' statistics.
    pub fn stats(&self) -> OrchestratorStats {
        let completion_cache = self.gateway.cache().stats();
        let embedding_cache = self.embeddings.stats();
        let metrics = self.observe(|o| {
            o.snapshot(completion_cache.hit_rate(), embedding_cache.hit_rate())
        });
        OrchestratorStats {
            metrics,
            completion_cache,
            embedding_cache,
            active_sessions: self.sessions.session_count(),
        }
    }

    /// Most-hit entries of the completion and embedding caches.
    pub fn top_cache_entries(&self, n: usize) -> (Vec<EntrySummary>, Vec<EntrySummary>) {
        (
            self.gateway.cache().top_entries(n),
            self.embeddings.top_entries(n),
        )
    }

    /// Empty both caches and reset their counters.
    pub fn clear_caches(&self) {
        self.gateway.cache().clear();
        self.embeddings.clear();
    }

    /// Drop expired entries from both caches now.
    pub fn purge_caches(&self) -> usize {
        let completion = self.gateway.cache().purge_expired();
        let embedding = self.embeddings.purge_expired();
        standardgpt_observability::tracing_setup::events::cache_evicted(
            "all",
            (completion + embedding) as u64,
            0,
        );
        completion + embedding
    }

    pub fn health(&self) -> HealthReport {
        HealthReport {
            completion: self.completion.is_available(),
            search: self.search.is_available(),
            embedding: self.embedder.is_available(),
            prompts_complete: self.gateway.prompts().is_complete(),
            completion_service: self.completion.name().to_string(),
            search_engine: self.search.name().to_string(),
            embedding_provider: self.embedder.name().to_string(),
        }
    }

    pub fn completion_service(&self) -> &C {
        &self.completion
    }

    pub fn search_engine(&self) -> &S {
        &self.search
    }

    pub fn embedding_provider(&self) -> &E {
        &self.embedder
    }

    pub fn embedding_cache(&self) -> &EmbeddingCache {
        &self.embeddings
    }

    pub fn completion_cache(&self) -> &CompletionCache {
        self.gateway.cache()
    }
}
