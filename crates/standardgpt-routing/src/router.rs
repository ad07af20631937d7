//! Router: one retrieval strategy per question.
//!
//! Priority, first match wins:
//! 1. recognizer finds a reference → reference-filtered (no classifier call)
//! 2. classifier says `personal` → handbook
//! 3. classifier says `memory` and memory is non-empty → context-dependent
//! 4. otherwise → content-only
//!
//! Classifier failure, timeout, or an unknown label is recorded as
//! `ClassificationAmbiguous` and lands on content-only.

use std::time::Duration;

use tracing::{debug, warn};

use standardgpt_cache::CompletionGateway;
use standardgpt_core::constants::EMPTY_MEMORY_SENTINEL;
use standardgpt_core::models::{AuditKind, AuditRecord, RouteDecision, StandardReference};
use standardgpt_core::prompts::{OperationKind, PromptFields, FIELD_MEMORY, FIELD_QUESTION};
use standardgpt_core::traits::ICompletionService;

use crate::label::RouteLabel;
use crate::recognizer::extract_references;

const COMPONENT: &str = "router";

/// Result of routing one question.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingOutcome {
    pub decision: RouteDecision,
    /// References backing a reference-filtered decision; empty otherwise.
    pub references: Vec<StandardReference>,
    /// Parsed classifier label, when the classifier was consulted and understood.
    pub label: Option<RouteLabel>,
    pub audits: Vec<AuditRecord>,
}

impl RoutingOutcome {
    fn new(decision: RouteDecision) -> Self {
        Self {
            decision,
            references: Vec::new(),
            label: None,
            audits: Vec::new(),
        }
    }
}

pub struct Router<C> {
    gateway: CompletionGateway<C>,
    classification_timeout: Duration,
}

impl<C: ICompletionService> Router<C> {
    pub fn new(gateway: CompletionGateway<C>, classification_timeout: Duration) -> Self {
        Self {
            gateway,
            classification_timeout,
        }
    }

    /// Route `question` given the rendered conversation `memory` (`"0"` when empty).
    pub async fn route(&self, question: &str, memory: &str) -> RoutingOutcome {
        let found = extract_references(question);
        if !found.is_empty() {
            return self.reference_route(question, found).await;
        }

        let memory_empty = memory.trim() == EMPTY_MEMORY_SENTINEL || memory.trim().is_empty();
        let fields = PromptFields::new()
            .with(FIELD_QUESTION, question)
            .with(FIELD_MEMORY, memory);

        let raw = match self
            .gateway
            .call(OperationKind::Classify, &fields, Some(self.classification_timeout))
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "classification failed, routing content-only");
                let mut outcome = RoutingOutcome::new(RouteDecision::ContentOnly);
                outcome.audits.push(AuditRecord::new(
                    AuditKind::ClassificationAmbiguous,
                    COMPONENT,
                    format!("classifier unavailable: {e}"),
                ));
                return outcome;
            }
        };

        let Some(label) = RouteLabel::parse(&raw) else {
            debug!(raw = %raw, "unrecognized route label");
            let mut outcome = RoutingOutcome::new(RouteDecision::ContentOnly);
            outcome.audits.push(AuditRecord::new(
                AuditKind::ClassificationAmbiguous,
                COMPONENT,
                format!("unrecognized label '{raw}'"),
            ));
            return outcome;
        };

        let mut outcome = match label {
            RouteLabel::Personal => RoutingOutcome::new(RouteDecision::Handbook),
            RouteLabel::Memory if !memory_empty => {
                RoutingOutcome::new(RouteDecision::ContextDependent)
            }
            RouteLabel::Memory => {
                let mut outcome = RoutingOutcome::new(RouteDecision::ContentOnly);
                outcome.audits.push(AuditRecord::new(
                    AuditKind::ClassificationAmbiguous,
                    COMPONENT,
                    "follow-up label without conversation memory",
                ));
                outcome
            }
            RouteLabel::Including => self.including_without_match(question).await,
            RouteLabel::Without => RoutingOutcome::new(RouteDecision::ContentOnly),
        };
        outcome.label = Some(label);
        outcome
    }

    async fn reference_route(
        &self,
        question: &str,
        found: Vec<StandardReference>,
    ) -> RoutingOutcome {
        let mut outcome = RoutingOutcome::new(RouteDecision::ReferenceFiltered);
        if found.iter().all(StandardReference::has_alphabetic_prefix) {
            outcome.references = found;
            return outcome;
        }

        // Some match is a bare number; ask for the full identifiers.
        match self.extract_standard(question).await {
            Some(extracted) => outcome.references = extracted,
            None => {
                outcome.audits.push(AuditRecord::new(
                    AuditKind::ExtractionFallback,
                    COMPONENT,
                    "standard extraction returned nothing usable, keeping recognizer matches",
                ));
                outcome.references = found;
            }
        }
        outcome
    }

    /// Classifier saw a standard the recognizer missed.
    async fn including_without_match(&self, question: &str) -> RoutingOutcome {
        match self.extract_standard(question).await {
            Some(extracted) => {
                let mut outcome = RoutingOutcome::new(RouteDecision::ReferenceFiltered);
                outcome.references = extracted;
                outcome
            }
            None => {
                let mut outcome = RoutingOutcome::new(RouteDecision::ContentOnly);
                outcome.audits.push(AuditRecord::new(
                    AuditKind::ExtractionFallback,
                    COMPONENT,
                    "classifier reported a standard but none could be extracted",
                ));
                outcome
            }
        }
    }

    /// Cached ExtractStandard call, re-validated through the recognizer.
    async fn extract_standard(&self, question: &str) -> Option<Vec<StandardReference>> {
        let fields = PromptFields::new().with(FIELD_QUESTION, question);
        match self
            .gateway
            .call(OperationKind::ExtractStandard, &fields, Some(self.classification_timeout))
            .await
        {
            Ok(raw) => {
                let refs = extract_references(&raw);
                (!refs.is_empty()).then_some(refs)
            }
            Err(e) => {
                warn!(error = %e, "standard extraction failed");
                None
            }
        }
    }
}
