//! Query optimization: rewrite the question before embedding and matching.
//!
//! Both rewrites are cached completion calls with their own deadline. Any
//! failure, expiry, or empty output falls back to the raw question so the
//! pipeline never blocks on this step.

mod rewrite;

use std::time::Duration;

use standardgpt_cache::CompletionGateway;
use standardgpt_core::models::{AuditRecord, RouteDecision};
use standardgpt_core::prompts::OperationKind;
use standardgpt_core::traits::ICompletionService;

/// Text used downstream of the optimization stage.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizedQuery {
    /// Text that is embedded for the vector clause.
    pub semantic_text: String,
    /// Keywords for the content-only match clause; the raw question on other routes.
    pub match_text: String,
    pub audits: Vec<AuditRecord>,
}

pub struct QueryOptimizer<C> {
    gateway: CompletionGateway<C>,
    timeout: Duration,
}

impl<C: ICompletionService> QueryOptimizer<C> {
    pub fn new(gateway: CompletionGateway<C>, timeout: Duration) -> Self {
        Self { gateway, timeout }
    }

    /// Semantic rewrite always; the textual rewrite only for content-only
    /// retrieval, where it feeds the match clause. The two calls run concurrently.
    pub async fn optimize(&self, question: &str, route: RouteDecision) -> OptimizedQuery {
        let semantic = rewrite::rewrite(
            &self.gateway,
            OperationKind::OptimizeSemantic,
            question,
            self.timeout,
        );

        if route != RouteDecision::ContentOnly {
            let semantic = semantic.await;
            return OptimizedQuery {
                semantic_text: semantic.text,
                match_text: question.trim().to_string(),
                audits: semantic.audit.into_iter().collect(),
            };
        }

        let textual = rewrite::rewrite(
            &self.gateway,
            OperationKind::OptimizeTextual,
            question,
            self.timeout,
        );
        let (semantic, textual) = tokio::join!(semantic, textual);
        OptimizedQuery {
            semantic_text: semantic.text,
            match_text: textual.text,
            audits: semantic.audit.into_iter().chain(textual.audit).collect(),
        }
    }
}
