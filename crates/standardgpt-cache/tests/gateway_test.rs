use std::sync::{Arc, Mutex};
use std::time::Duration;

use standardgpt_cache::{CompletionCache, CompletionGateway};
use standardgpt_core::errors::{CompletionError, FailureKind, StandardGptError};
use standardgpt_core::prompts::{
    CompletionRequest, OperationKind, PromptFields, PromptRegistry, FIELD_FRAGMENTS, FIELD_MEMORY,
    FIELD_QUESTION,
};
use standardgpt_core::traits::ICompletionService;
use test_fixtures::ScriptedCompletion;

fn gateway(service: ScriptedCompletion) -> (CompletionGateway<ScriptedCompletion>, Arc<ScriptedCompletion>) {
    let service = Arc::new(service);
    let gateway = CompletionGateway::new(
        service.clone(),
        Arc::new(CompletionCache::new(100, Duration::from_secs(60))),
        Arc::new(PromptRegistry::default()),
    );
    (gateway, service)
}

fn classify_fields(question: &str, memory: &str) -> PromptFields {
    PromptFields::new()
        .with(FIELD_QUESTION, question)
        .with(FIELD_MEMORY, memory)
}

#[tokio::test]
async fn identical_calls_reach_the_service_once() {
    let (gateway, service) =
        gateway(ScriptedCompletion::new().reply(OperationKind::Classify, "  without \n"));
    let fields = classify_fields("Hva sier standarden om tykkelse?", "0");
    for _ in 0..3 {
        let label = gateway.call(OperationKind::Classify, &fields, None).await.unwrap();
        assert_eq!(label, "without");
    }
    assert_eq!(service.call_count(OperationKind::Classify), 1);
}

#[tokio::test]
async fn different_memory_is_a_different_key() {
    let (gateway, service) =
        gateway(ScriptedCompletion::new().reply(OperationKind::Classify, "memory"));
    gateway
        .call(OperationKind::Classify, &classify_fields("q", "Bruker: a"), None)
        .await
        .unwrap();
    gateway
        .call(OperationKind::Classify, &classify_fields("q", "Bruker: b"), None)
        .await
        .unwrap();
    assert_eq!(service.call_count(OperationKind::Classify), 2);
}

#[tokio::test(start_paused = true)]
async fn slow_call_hits_the_deadline() {
    let (gateway, _) = gateway(
        ScriptedCompletion::new()
            .reply(OperationKind::OptimizeTextual, "tykkelse")
            .delay(OperationKind::OptimizeTextual, Duration::from_secs(30)),
    );
    let fields = PromptFields::new().with(FIELD_QUESTION, "q");
    let err = gateway
        .call(OperationKind::OptimizeTextual, &fields, Some(Duration::from_secs(2)))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StandardGptError::CompletionError(CompletionError::Timeout { .. })
    ));
    assert_eq!(err.failure_kind(), FailureKind::UpstreamTransient);
}

#[tokio::test]
async fn empty_completion_is_malformed_and_not_cached() {
    let (gateway, service) = gateway(ScriptedCompletion::new().reply(OperationKind::ExtractStandard, "   "));
    let fields = PromptFields::new().with(FIELD_QUESTION, "q");
    for _ in 0..2 {
        let err = gateway
            .call(OperationKind::ExtractStandard, &fields, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StandardGptError::CompletionError(CompletionError::MalformedResponse { .. })
        ));
    }
    assert_eq!(service.call_count(OperationKind::ExtractStandard), 2);
}

#[tokio::test]
async fn missing_field_is_a_config_error_without_upstream_call() {
    let (gateway, service) = gateway(ScriptedCompletion::new().reply(OperationKind::Answer, "svar"));
    let fields = PromptFields::new().with(FIELD_QUESTION, "q");
    let err = gateway.call(OperationKind::Answer, &fields, None).await.unwrap_err();
    assert_eq!(err.failure_kind(), FailureKind::Internal);
    assert_eq!(service.total_calls(), 0);
}

fn answer_fields(question: &str) -> PromptFields {
    PromptFields::new()
        .with(FIELD_QUESTION, question)
        .with(FIELD_FRAGMENTS, "[1] M-004:2018: Isolasjonstykkelse for rør.")
        .with(FIELD_MEMORY, "0")
}

/// Collects fragments handed to a token sink.
#[derive(Default)]
struct Fragments(Mutex<Vec<String>>);

impl Fragments {
    fn push(&self, fragment: &str) {
        self.0.lock().unwrap().push(fragment.to_string());
    }

    fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

#[tokio::test]
async fn streaming_miss_delivers_fragments_then_hit_delivers_whole_text() {
    let (gateway, service) = gateway(
        ScriptedCompletion::new().reply(OperationKind::Answer, "Rør skal isoleres."),
    );
    let fields = answer_fields("Hva sier M-004?");
    let fragments = Arc::new(Fragments::default());
    let sink = {
        let fragments = Arc::clone(&fragments);
        move |f: &str| fragments.push(f)
    };

    let text = gateway
        .call_streaming(OperationKind::Answer, &fields, None, &sink)
        .await
        .unwrap();
    assert_eq!(text, "Rør skal isoleres.");
    assert_eq!(fragments.take(), vec!["Rør ", "skal ", "isoleres."]);

    gateway
        .call_streaming(OperationKind::Answer, &fields, None, &sink)
        .await
        .unwrap();
    assert_eq!(fragments.take(), vec!["Rør skal isoleres."]);
    assert_eq!(service.call_count(OperationKind::Answer), 1);
}

/// Service with no incremental output of its own.
struct WholeTextService;

impl ICompletionService for WholeTextService {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, CompletionError> {
        Ok("Hele svaret.".to_string())
    }

    fn name(&self) -> &str {
        "whole-text"
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[tokio::test]
async fn service_without_streaming_yields_one_fragment() {
    let gateway = CompletionGateway::new(
        Arc::new(WholeTextService),
        Arc::new(CompletionCache::new(100, Duration::from_secs(60))),
        Arc::new(PromptRegistry::default()),
    );
    let fragments = Arc::new(Fragments::default());
    let sink = {
        let fragments = Arc::clone(&fragments);
        move |f: &str| fragments.push(f)
    };

    let text = gateway
        .call_streaming(OperationKind::Answer, &answer_fields("q"), None, &sink)
        .await
        .unwrap();
    assert_eq!(text, "Hele svaret.");
    assert_eq!(fragments.take(), vec!["Hele svaret."]);
}

#[tokio::test]
async fn failed_streaming_call_delivers_nothing() {
    let (gateway, _) = gateway(ScriptedCompletion::new().fail(
        OperationKind::Answer,
        CompletionError::Unavailable {
            reason: "overloaded".to_string(),
        },
    ));
    let fragments = Arc::new(Fragments::default());
    let sink = {
        let fragments = Arc::clone(&fragments);
        move |f: &str| fragments.push(f)
    };

    let result = gateway
        .call_streaming(OperationKind::Answer, &answer_fields("q"), None, &sink)
        .await;
    assert!(result.is_err());
    assert!(fragments.take().is_empty());
}
