//! Memory resolver: which standard a follow-up question refers to.
//!
//! Deterministic first: the newest turn that names a standard wins, its
//! answer taking precedence over its question. Only when several turns name
//! standards is the ExtractFromMemory call consulted. Its picks are accepted
//! only for references actually present in memory, and are appended after
//! the newest turn's references, never in place of them.

use std::time::Duration;

use tracing::{debug, warn};

use standardgpt_cache::CompletionGateway;
use standardgpt_core::constants::EMPTY_MEMORY_SENTINEL;
use standardgpt_core::models::{AuditKind, AuditRecord, ConversationTurn, StandardReference};
use standardgpt_core::prompts::{OperationKind, PromptFields, FIELD_MEMORY, FIELD_QUESTION};
use standardgpt_core::traits::ICompletionService;

use crate::recognizer::{extract_references, merge_unique};

const COMPONENT: &str = "memory_resolver";

/// References recovered from conversation memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub references: Vec<StandardReference>,
    /// Whether the ExtractFromMemory call was consulted.
    pub used_completion: bool,
    pub audits: Vec<AuditRecord>,
}

impl Resolution {
    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}

pub struct MemoryResolver<C> {
    gateway: CompletionGateway<C>,
    timeout: Duration,
}

impl<C: ICompletionService> MemoryResolver<C> {
    pub fn new(gateway: CompletionGateway<C>, timeout: Duration) -> Self {
        Self { gateway, timeout }
    }

    /// Resolve the references a follow-up question points at.
    ///
    /// `turns` are oldest first; `memory` is the rendered window passed to the
    /// extraction prompt. An empty result means the caller demotes the route.
    pub async fn resolve(
        &self,
        question: &str,
        turns: &[ConversationTurn],
        memory: &str,
    ) -> Resolution {
        let own = extract_references(question);
        if !own.is_empty() {
            return Resolution {
                references: own,
                ..Resolution::default()
            };
        }

        if turns.is_empty() || memory.trim() == EMPTY_MEMORY_SENTINEL || memory.trim().is_empty() {
            return Resolution::default();
        }

        let per_turn: Vec<Vec<StandardReference>> = turns
            .iter()
            .rev()
            .map(turn_references)
            .filter(|refs| !refs.is_empty())
            .collect();

        let Some(primary) = per_turn.first().cloned() else {
            debug!("no standard mentioned in memory");
            return Resolution::default();
        };
        if per_turn.len() == 1 {
            return Resolution {
                references: primary,
                ..Resolution::default()
            };
        }

        let mut candidates = Vec::new();
        for refs in &per_turn {
            merge_unique(&mut candidates, refs.iter().cloned());
        }

        let fields = PromptFields::new()
            .with(FIELD_QUESTION, question)
            .with(FIELD_MEMORY, memory);
        let picked = match self
            .gateway
            .call(OperationKind::ExtractFromMemory, &fields, Some(self.timeout))
            .await
        {
            Ok(raw) => extract_references(&raw)
                .into_iter()
                .filter_map(|r| candidates.iter().find(|c| c.same_as(&r)).cloned())
                .collect::<Vec<_>>(),
            Err(e) => {
                warn!(error = %e, "memory extraction failed");
                Vec::new()
            }
        };

        if picked.is_empty() {
            return Resolution {
                references: primary,
                used_completion: true,
                audits: vec![AuditRecord::new(
                    AuditKind::ExtractionFallback,
                    COMPONENT,
                    "memory extraction unusable, using newest mention",
                )],
            };
        }

        let mut references = primary;
        merge_unique(&mut references, picked);
        Resolution {
            references,
            used_completion: true,
            audits: Vec::new(),
        }
    }
}

/// A turn's references: the answer's if it names any, else the question's.
fn turn_references(turn: &ConversationTurn) -> Vec<StandardReference> {
    let from_answer = extract_references(&turn.answer);
    if from_answer.is_empty() {
        extract_references(&turn.question)
    } else {
        from_answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_takes_precedence_over_question() {
        let turn = ConversationTurn::new("Hva handler M-004 om?", "M-004:2018 beskriver isolasjon.");
        assert_eq!(turn_references(&turn), vec![StandardReference::new("M-004:2018")]);
    }

    #[test]
    fn question_used_when_answer_is_silent() {
        let turn = ConversationTurn::new("Hva sier NS 3420?", "Den beskriver prosesskoder.");
        assert_eq!(turn_references(&turn), vec![StandardReference::new("NS 3420")]);
    }
}
