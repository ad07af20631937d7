//! The stage sequence of one question.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, Instrument};

use standardgpt_core::errors::{FailureKind, SearchError, StandardGptError, StandardGptResult};
use standardgpt_core::models::{AuditKind, AuditRecord, RouteDecision, SearchHit, StandardReference};
use standardgpt_core::prompts::{
    OperationKind, PromptFields, FIELD_FRAGMENTS, FIELD_MEMORY, FIELD_QUESTION,
};
use standardgpt_core::traits::{ICompletionService, IEmbeddingProvider, ISearchEngine};
use standardgpt_observability::tracing_setup::events;
use standardgpt_observability::{generation_span, retrieval_span, routing_span};
use standardgpt_retrieval::{build_query, format_fragments};

use crate::orchestrator::Orchestrator;
use crate::progress::{Answer, ProgressEmitter, Stage};

const COMPONENT: &str = "orchestrator";

/// Route after memory resolution.
struct Routed {
    route: RouteDecision,
    effective: RouteDecision,
    references: Vec<StandardReference>,
}

impl<C, S, E> Orchestrator<C, S, E>
where
    C: ICompletionService,
    S: ISearchEngine,
    E: IEmbeddingProvider,
{
    /// Run every stage. Audits collect in `audits` so a failed run still
    /// reports the ones raised before the failure.
    pub(crate) async fn run(
        &self,
        request_id: &str,
        session_id: &str,
        question: &str,
        emitter: &ProgressEmitter,
        audits: &mut Vec<AuditRecord>,
    ) -> StandardGptResult<Answer> {
        emitter.stage(Stage::Routing).await?;
        let memory = self.sessions.render(session_id);
        let routed = self
            .route(question, session_id, &memory, &mut *audits)
            .instrument(routing_span!(question))
            .await;

        emitter.stage(Stage::Optimizing).await?;
        let optimized = self.optimizer.optimize(question, routed.effective).await;
        audits.extend(optimized.audits);

        emitter.stage(Stage::Retrieving).await?;
        let hits = self
            .retrieve(&routed, &optimized.semantic_text, &optimized.match_text, &mut *audits)
            .instrument(retrieval_span!(routed.effective.as_str()))
            .await?;
        let context = format_fragments(&hits, self.max_context_chars);
        debug!(
            hits = hits.len(),
            included = context.included,
            truncated = context.truncated,
            "context formatted"
        );

        emitter.stage(Stage::Generating).await?;
        let fields = PromptFields::new()
            .with(FIELD_QUESTION, question)
            .with(FIELD_FRAGMENTS, context.text)
            .with(FIELD_MEMORY, memory);
        let text = self
            .generate(&fields, emitter)
            .instrument(generation_span!(context.included))
            .await?;

        Ok(Answer {
            request_id: request_id.to_string(),
            text,
            route: routed.route,
            effective_route: routed.effective,
            demoted: routed.route != routed.effective,
            references: routed.references.iter().map(|r| r.to_string()).collect(),
            fragment_count: context.included,
            latency: Duration::ZERO,
            audits: Vec::new(),
        })
    }

    /// Answer completion, forwarding fragments as token events while the
    /// upstream call is still running.
    async fn generate(
        &self,
        fields: &PromptFields,
        emitter: &ProgressEmitter,
    ) -> StandardGptResult<String> {
        let (token_tx, mut token_rx) = mpsc::unbounded_channel::<String>();
        let sink = move |fragment: &str| {
            let _ = token_tx.send(fragment.to_string());
        };
        let completion = async move {
            self.gateway
                .call_streaming(OperationKind::Answer, fields, Some(self.answer_timeout), &sink)
                .await
        };
        // Ends once the completion future, and with it the sender, is dropped.
        let forward = async {
            while let Some(fragment) = token_rx.recv().await {
                emitter.token(fragment).await?;
            }
            Ok::<(), StandardGptError>(())
        };

        let (text, forwarded) = tokio::join!(completion, forward);
        let text = text?;
        forwarded?;
        Ok(text)
    }

    /// Router, then the memory resolver for follow-ups, with demotion.
    async fn route(
        &self,
        question: &str,
        session_id: &str,
        memory: &str,
        audits: &mut Vec<AuditRecord>,
    ) -> Routed {
        let outcome = self.router.route(question, memory).await;
        audits.extend(outcome.audits);
        let references: Vec<String> = outcome.references.iter().map(|r| r.to_string()).collect();
        events::route_decided(
            outcome.decision.as_str(),
            &references,
            outcome.label.map(|l| l.as_str()),
        );

        if outcome.decision != RouteDecision::ContextDependent {
            return Routed {
                route: outcome.decision,
                effective: outcome.decision,
                references: outcome.references,
            };
        }

        let turns = self.sessions.turns(session_id);
        let resolution = self.resolver.resolve(question, &turns, memory).await;
        audits.extend(resolution.audits);
        if resolution.references.is_empty() {
            events::route_demoted(
                RouteDecision::ContextDependent.as_str(),
                RouteDecision::ContentOnly.as_str(),
                "no reference resolved from memory",
            );
            audits.push(AuditRecord::new(
                AuditKind::MemoryResolutionEmpty,
                COMPONENT,
                "context-dependent route demoted to content-only",
            ));
            return Routed {
                route: RouteDecision::ContextDependent,
                effective: RouteDecision::ContentOnly,
                references: Vec::new(),
            };
        }

        Routed {
            route: RouteDecision::ContextDependent,
            effective: RouteDecision::ContextDependent,
            references: resolution.references,
        }
    }

    /// Embed, build the query, search. A transient embedding failure
    /// degrades to text-only; a wrong-length vector is fatal.
    async fn retrieve(
        &self,
        routed: &Routed,
        semantic_text: &str,
        match_text: &str,
        audits: &mut Vec<AuditRecord>,
    ) -> StandardGptResult<Vec<SearchHit>> {
        let vector = match self.embeddings.embed(self.embedder.as_ref(), semantic_text).await {
            Ok(vector) => Some(vector),
            Err(e) if e.failure_kind() == FailureKind::UpstreamTransient => {
                audits.push(AuditRecord::new(
                    AuditKind::EmbeddingDegraded,
                    COMPONENT,
                    format!("text-only retrieval: {e}"),
                ));
                None
            }
            Err(e) => return Err(e),
        };

        let query = build_query(
            routed.effective,
            &routed.references,
            match_text,
            vector.as_deref(),
            &self.search_config,
        )?;

        match tokio::time::timeout(self.search_timeout, self.search.search(&query)).await {
            Ok(Ok(hits)) => Ok(hits),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(StandardGptError::from(SearchError::Timeout {
                timeout_ms: self.search_timeout.as_millis() as u64,
            })),
        }
    }
}
