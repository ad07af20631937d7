//! Property tests for query construction and fragment formatting.

use proptest::prelude::*;

use standardgpt_core::config::SearchConfig;
use standardgpt_core::models::{QueryObject, RouteDecision, SearchHit, StandardReference};
use standardgpt_core::text::char_len;
use standardgpt_retrieval::{build_query, format_fragments};

fn route() -> impl Strategy<Value = RouteDecision> {
    prop::sample::select(RouteDecision::ALL.to_vec())
}

fn hit() -> impl Strategy<Value = SearchHit> {
    ("[A-Z]{2} [0-9]{3,4}", "\\PC{0,300}", 0.0f64..20.0).prop_map(|(reference, text, score)| {
        SearchHit {
            text,
            score,
            reference,
            page: None,
        }
    })
}

proptest! {
    #[test]
    fn route_determines_query_shape(
        route in route(),
        refs in prop::collection::vec("[A-Z]{2} [0-9]{3}", 0..4),
        text in "\\PC{0,40}",
    ) {
        let refs: Vec<StandardReference> = refs.into_iter().map(StandardReference::new).collect();
        let result = build_query(route, &refs, &text, None, &SearchConfig::default());
        match route {
            RouteDecision::ReferenceFiltered | RouteDecision::ContextDependent => {
                if refs.is_empty() {
                    prop_assert!(result.is_err());
                } else {
                    let q = result.unwrap();
                    prop_assert!(matches!(q, QueryObject::ReferenceFiltered { .. }), "expected ReferenceFiltered");
                    prop_assert_eq!(q.references(), refs.as_slice());
                }
            }
            RouteDecision::Handbook => {
                prop_assert!(matches!(result, Ok(QueryObject::Handbook { .. })), "expected Handbook");
            }
            RouteDecision::ContentOnly => {
                prop_assert!(matches!(result, Ok(QueryObject::ContentOnly { .. })), "expected ContentOnly");
            }
        }
    }

    #[test]
    fn context_never_exceeds_budget(
        hits in prop::collection::vec(hit(), 0..12),
        max_chars in 10usize..3000,
    ) {
        let ctx = format_fragments(&hits, max_chars);
        if hits.is_empty() {
            prop_assert_eq!(ctx.included, 0);
        } else {
            prop_assert!(char_len(&ctx.text) <= max_chars);
            prop_assert!(ctx.included >= 1);
            prop_assert!(ctx.included <= hits.len());
        }
    }
}
