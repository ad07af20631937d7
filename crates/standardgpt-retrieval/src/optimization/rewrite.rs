use std::time::Duration;

use tracing::{debug, warn};

use standardgpt_cache::CompletionGateway;
use standardgpt_core::models::{AuditKind, AuditRecord};
use standardgpt_core::prompts::{OperationKind, PromptFields, FIELD_QUESTION};
use standardgpt_core::traits::ICompletionService;

const COMPONENT: &str = "query_optimizer";

pub(super) struct Rewrite {
    pub text: String,
    pub audit: Option<AuditRecord>,
}

pub(super) async fn rewrite<C: ICompletionService>(
    gateway: &CompletionGateway<C>,
    kind: OperationKind,
    question: &str,
    timeout: Duration,
) -> Rewrite {
    let fields = PromptFields::new().with(FIELD_QUESTION, question);
    match gateway.call(kind, &fields, Some(timeout)).await {
        Ok(text) => {
            let text = strip_quotes(&text);
            if text.is_empty() {
                return fallback(kind, question, "empty rewrite".to_string());
            }
            debug!(kind = kind.as_str(), "question rewritten");
            Rewrite { text, audit: None }
        }
        Err(e) => {
            warn!(kind = kind.as_str(), error = %e, "rewrite failed, using raw question");
            fallback(kind, question, e.to_string())
        }
    }
}

fn fallback(kind: OperationKind, question: &str, reason: String) -> Rewrite {
    Rewrite {
        text: question.trim().to_string(),
        audit: Some(AuditRecord::new(
            AuditKind::OptimizationFallback,
            COMPONENT,
            format!("{kind}: {reason}"),
        )),
    }
}

/// Models like to wrap a single-line rewrite in quotes.
fn strip_quotes(text: &str) -> String {
    text.trim()
        .trim_matches(|c| c == '"' || c == '\'' || c == '«' || c == '»')
        .trim()
        .to_string()
}
