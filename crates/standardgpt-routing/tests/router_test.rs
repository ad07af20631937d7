use std::sync::Arc;
use std::time::Duration;

use standardgpt_cache::{CompletionCache, CompletionGateway};
use standardgpt_core::errors::CompletionError;
use standardgpt_core::models::{AuditKind, ConversationTurn, RouteDecision, StandardReference};
use standardgpt_core::prompts::{OperationKind, PromptRegistry};
use standardgpt_routing::{MemoryResolver, RouteLabel, Router};
use standardgpt_session::memory::{ConversationMemory, RenderLimits};
use test_fixtures::{routing_scenarios, RoutingScenario, ScriptedCompletion};

const TIMEOUT: Duration = Duration::from_secs(8);

fn gateway(service: &Arc<ScriptedCompletion>) -> CompletionGateway<ScriptedCompletion> {
    CompletionGateway::new(
        Arc::clone(service),
        Arc::new(CompletionCache::new(100, Duration::from_secs(60))),
        Arc::new(PromptRegistry::default()),
    )
}

fn memory_of(turns: &[ConversationTurn]) -> String {
    let mut memory = ConversationMemory::new("test");
    for turn in turns {
        memory.append(turn.clone());
    }
    memory.render(RenderLimits::default())
}

fn refs(values: &[&str]) -> Vec<StandardReference> {
    values.iter().map(|v| StandardReference::new(*v)).collect()
}

async fn run_scenario(scenario: &RoutingScenario) {
    let mut script = ScriptedCompletion::new();
    if let Some(reply) = &scenario.input.classifier_reply {
        script = script.reply(OperationKind::Classify, reply.clone());
    }
    if let Some(reply) = &scenario.input.memory_extraction_reply {
        script = script.reply(OperationKind::ExtractFromMemory, reply.clone());
    }
    let service = Arc::new(script);
    let gw = gateway(&service);
    let router = Router::new(gw.clone(), TIMEOUT);
    let resolver = MemoryResolver::new(gw, TIMEOUT);

    let turns: Vec<ConversationTurn> = scenario
        .input
        .turns
        .iter()
        .map(|t| ConversationTurn::new(t.question.clone(), t.answer.clone()))
        .collect();
    let memory = memory_of(&turns);

    let outcome = router.route(&scenario.input.question, &memory).await;
    assert_eq!(outcome.decision, scenario.expected_output.route, "{}", scenario.name);

    let (effective, references) = if outcome.decision == RouteDecision::ContextDependent {
        let resolution = resolver
            .resolve(&scenario.input.question, &turns, &memory)
            .await;
        if resolution.is_empty() {
            (RouteDecision::ContentOnly, Vec::new())
        } else {
            (RouteDecision::ContextDependent, resolution.references)
        }
    } else {
        (outcome.decision, outcome.references)
    };

    assert_eq!(effective, scenario.expected_output.effective_route, "{}", scenario.name);
    let expected: Vec<&str> = scenario.expected_output.references.iter().map(String::as_str).collect();
    assert_eq!(references, refs(&expected), "{}", scenario.name);
    assert_eq!(
        service.call_count(OperationKind::Classify) > 0,
        scenario.expected_output.classifier_called,
        "{}",
        scenario.name
    );
}

#[tokio::test]
async fn golden_routing_scenarios() {
    let scenarios = routing_scenarios();
    assert!(!scenarios.is_empty());
    for scenario in &scenarios {
        run_scenario(scenario).await;
    }
}

#[tokio::test]
async fn explicit_reference_ignores_memory_and_classifier() {
    let service = Arc::new(ScriptedCompletion::new().reply(OperationKind::Classify, "memory"));
    let router = Router::new(gateway(&service), TIMEOUT);
    let memory = memory_of(&[ConversationTurn::new("q", "NS 3420-1:2019 beskriver koder.")]);

    let outcome = router.route("Hva sier NS 3457-7 om bygningstyper?", &memory).await;
    assert_eq!(outcome.decision, RouteDecision::ReferenceFiltered);
    assert_eq!(outcome.references, refs(&["NS 3457-7"]));
    assert_eq!(service.total_calls(), 0);
}

#[tokio::test]
async fn empty_memory_never_routes_context_dependent() {
    let service = Arc::new(ScriptedCompletion::new().reply(OperationKind::Classify, "memory"));
    let router = Router::new(gateway(&service), TIMEOUT);

    let outcome = router.route("Kan du forklare det nærmere?", "0").await;
    assert_eq!(outcome.decision, RouteDecision::ContentOnly);
    assert_eq!(outcome.label, Some(RouteLabel::Memory));
}

#[tokio::test]
async fn personal_label_routes_to_handbook() {
    let service = Arc::new(ScriptedCompletion::new().reply(OperationKind::Classify, "\"Personal\""));
    let router = Router::new(gateway(&service), TIMEOUT);

    let outcome = router.route("Hvor mange feriedager har jeg?", "0").await;
    assert_eq!(outcome.decision, RouteDecision::Handbook);
    assert!(outcome.audits.is_empty());
}

#[tokio::test]
async fn classifier_failure_falls_back_to_content_only() {
    let service = Arc::new(ScriptedCompletion::new().fail(
        OperationKind::Classify,
        CompletionError::Unavailable {
            reason: "rate limited".to_string(),
        },
    ));
    let router = Router::new(gateway(&service), TIMEOUT);

    let outcome = router.route("Hva er krav til rekkverk?", "0").await;
    assert_eq!(outcome.decision, RouteDecision::ContentOnly);
    assert_eq!(outcome.audits.len(), 1);
    assert_eq!(outcome.audits[0].kind, AuditKind::ClassificationAmbiguous);
}

#[tokio::test(start_paused = true)]
async fn slow_classifier_times_out_to_content_only() {
    let service = Arc::new(
        ScriptedCompletion::new()
            .reply(OperationKind::Classify, "personal")
            .delay(OperationKind::Classify, Duration::from_secs(60)),
    );
    let router = Router::new(gateway(&service), TIMEOUT);

    let outcome = router.route("Hva er krav til rekkverk?", "0").await;
    assert_eq!(outcome.decision, RouteDecision::ContentOnly);
    assert_eq!(outcome.audits[0].kind, AuditKind::ClassificationAmbiguous);
}

#[tokio::test]
async fn unrecognized_label_is_not_retried_within_ttl() {
    let service = Arc::new(ScriptedCompletion::new().reply(OperationKind::Classify, "kanskje"));
    let router = Router::new(gateway(&service), TIMEOUT);

    for _ in 0..2 {
        let outcome = router.route("Hva er krav til rekkverk?", "0").await;
        assert_eq!(outcome.decision, RouteDecision::ContentOnly);
    }
    assert_eq!(service.call_count(OperationKind::Classify), 1);
}

#[tokio::test]
async fn bare_number_is_completed_by_extraction() {
    let service = Arc::new(
        ScriptedCompletion::new().reply(OperationKind::ExtractStandard, "NS 3457-9:2021"),
    );
    let router = Router::new(gateway(&service), TIMEOUT);

    let outcome = router.route("Hva står i 3457-9 2021?", "0").await;
    assert_eq!(outcome.decision, RouteDecision::ReferenceFiltered);
    assert_eq!(outcome.references, refs(&["NS 3457-9:2021"]));
    assert_eq!(service.call_count(OperationKind::Classify), 0);
}

#[tokio::test]
async fn unusable_extraction_keeps_recognizer_match() {
    let service = Arc::new(
        ScriptedCompletion::new().reply(OperationKind::ExtractStandard, "ingen standard funnet"),
    );
    let router = Router::new(gateway(&service), TIMEOUT);

    let outcome = router.route("Hva står i 3457-9 2021?", "0").await;
    assert_eq!(outcome.references, refs(&["3457-9:2021"]));
    assert_eq!(outcome.audits[0].kind, AuditKind::ExtractionFallback);
}

#[tokio::test]
async fn including_label_without_match_tries_extraction() {
    let service = Arc::new(
        ScriptedCompletion::new()
            .reply(OperationKind::Classify, "including")
            .reply(OperationKind::ExtractStandard, "NS 8405"),
    );
    let router = Router::new(gateway(&service), TIMEOUT);

    let outcome = router
        .route("hva sier standarden for totalentreprise om endringer?", "0")
        .await;
    assert_eq!(outcome.decision, RouteDecision::ReferenceFiltered);
    assert_eq!(outcome.references, refs(&["NS 8405"]));
    assert_eq!(outcome.label, Some(RouteLabel::Including));
}

#[tokio::test]
async fn lowercase_reference_routes_without_classifier_or_extraction() {
    let service = Arc::new(ScriptedCompletion::new());
    let router = Router::new(gateway(&service), TIMEOUT);

    let outcome = router.route("hva er krav i m-004", "Q: Hva sier NS 3420?\nA: ...").await;
    assert_eq!(outcome.decision, RouteDecision::ReferenceFiltered);
    assert_eq!(outcome.references, refs(&["m-004"]));

    let outcome = router.route("hva sier ns 3457-7?", "0").await;
    assert_eq!(outcome.references, refs(&["ns 3457-7"]));
    assert_eq!(service.total_calls(), 0);
}

#[tokio::test]
async fn lowercase_memory_mentions_match_extraction_output() {
    let service = Arc::new(
        ScriptedCompletion::new().reply(OperationKind::ExtractFromMemory, "NS 3420-1"),
    );
    let resolver = MemoryResolver::new(gateway(&service), TIMEOUT);
    let turns = vec![
        ConversationTurn::new("hva sier ns 3420-1?", "Den beskriver prosesskoder."),
        ConversationTurn::new("Og M-004?", "M-004:2018 beskriver isolasjon."),
    ];

    let resolution = resolver
        .resolve("Hva var den første?", &turns, &memory_of(&turns))
        .await;
    assert_eq!(resolution.references, refs(&["M-004:2018", "ns 3420-1"]));
}

#[tokio::test]
async fn including_label_without_extraction_is_content_only() {
    let service = Arc::new(ScriptedCompletion::new().reply(OperationKind::Classify, "including"));
    let router = Router::new(gateway(&service), TIMEOUT);

    let outcome = router.route("hva sier kontraktstandarden om endringer?", "0").await;
    assert_eq!(outcome.decision, RouteDecision::ContentOnly);
    assert_eq!(outcome.audits[0].kind, AuditKind::ExtractionFallback);
}

#[tokio::test]
async fn resolver_skips_completion_for_empty_memory() {
    let service = Arc::new(ScriptedCompletion::new());
    let resolver = MemoryResolver::new(gateway(&service), TIMEOUT);

    let resolution = resolver.resolve("Hvilken er nyest?", &[], "0").await;
    assert!(resolution.is_empty());
    assert_eq!(service.total_calls(), 0);
}

#[tokio::test]
async fn newest_answer_wins_without_competition() {
    let service = Arc::new(ScriptedCompletion::new());
    let resolver = MemoryResolver::new(gateway(&service), TIMEOUT);
    let turns = vec![
        ConversationTurn::new("Hva handler M-004 om?", "M-004:2018 beskriver isolasjon."),
        ConversationTurn::new("Takk, og hvordan måler man?", "Man måler tykkelse med skyvelære."),
    ];

    let resolution = resolver
        .resolve("Kan du utdype?", &turns, &memory_of(&turns))
        .await;
    assert_eq!(resolution.references, refs(&["M-004:2018"]));
    assert!(!resolution.used_completion);
}

#[tokio::test]
async fn competing_turns_append_extraction_after_newest_and_reject_invented_references() {
    let service = Arc::new(
        ScriptedCompletion::new().reply(OperationKind::ExtractFromMemory, "NS 3420-1, NS 9999"),
    );
    let resolver = MemoryResolver::new(gateway(&service), TIMEOUT);
    let turns = vec![
        ConversationTurn::new("Hva sier NS 3420-1?", "NS 3420-1 beskriver prosesskoder."),
        ConversationTurn::new("Og M-004?", "M-004:2018 beskriver isolasjon."),
    ];

    let resolution = resolver
        .resolve("Hva var den første?", &turns, &memory_of(&turns))
        .await;
    assert_eq!(resolution.references, refs(&["M-004:2018", "NS 3420-1"]));
    assert!(resolution.used_completion);
    assert_eq!(service.call_count(OperationKind::ExtractFromMemory), 1);
}

#[tokio::test]
async fn older_extraction_pick_never_displaces_newest_answer() {
    let service = Arc::new(
        ScriptedCompletion::new().reply(OperationKind::ExtractFromMemory, "NS 3420-1"),
    );
    let resolver = MemoryResolver::new(gateway(&service), TIMEOUT);
    let turns = vec![
        ConversationTurn::new("Hva gjelder for prosesskoder?", "Se NS 3420-1 for prosesskoder."),
        ConversationTurn::new("Og for isolasjon?", "M-004:2018 beskriver isolasjon."),
    ];

    let resolution = resolver
        .resolve("Kan du utdype mer om isolasjonskrav?", &turns, &memory_of(&turns))
        .await;
    assert_eq!(resolution.references[0], StandardReference::new("M-004:2018"));
    assert_eq!(resolution.references, refs(&["M-004:2018", "NS 3420-1"]));
}

#[tokio::test]
async fn extraction_repeating_newest_reference_adds_nothing() {
    let service = Arc::new(
        ScriptedCompletion::new().reply(OperationKind::ExtractFromMemory, "M-004:2018"),
    );
    let resolver = MemoryResolver::new(gateway(&service), TIMEOUT);
    let turns = vec![
        ConversationTurn::new("Hva sier NS 3420-1?", "NS 3420-1 beskriver prosesskoder."),
        ConversationTurn::new("Og M-004?", "M-004:2018 beskriver isolasjon."),
    ];

    let resolution = resolver
        .resolve("Hva med denne?", &turns, &memory_of(&turns))
        .await;
    assert_eq!(resolution.references, refs(&["M-004:2018"]));
    assert!(resolution.audits.is_empty());
}

#[tokio::test]
async fn failed_extraction_falls_back_to_newest_mention() {
    let service = Arc::new(ScriptedCompletion::new());
    let resolver = MemoryResolver::new(gateway(&service), TIMEOUT);
    let turns = vec![
        ConversationTurn::new("Hva sier NS 3420-1?", "NS 3420-1 beskriver prosesskoder."),
        ConversationTurn::new("Og M-004?", "M-004:2018 beskriver isolasjon."),
    ];

    let resolution = resolver
        .resolve("Hva med denne?", &turns, &memory_of(&turns))
        .await;
    assert_eq!(resolution.references, refs(&["M-004:2018"]));
    assert_eq!(resolution.audits[0].kind, AuditKind::ExtractionFallback);
}
