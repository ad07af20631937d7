//! Query builder. Pure: no I/O, inputs are never mutated.

use standardgpt_core::config::SearchConfig;
use standardgpt_core::constants::{CONTENT_MATCH_FIELDS, HANDBOOK_SCOPE};
use standardgpt_core::errors::RetrievalError;
use standardgpt_core::models::{QueryObject, RouteDecision, StandardReference};

/// Build the search request for an effective route.
///
/// Reference-filtered and context-dependent routes need at least one
/// reference; a context-dependent route without any must be demoted before
/// it gets here. A zero-length `vector` means text-only retrieval.
pub fn build_query(
    route: RouteDecision,
    references: &[StandardReference],
    match_text: &str,
    vector: Option<&[f32]>,
    config: &SearchConfig,
) -> Result<QueryObject, RetrievalError> {
    let vector = vector.filter(|v| !v.is_empty()).map(<[f32]>::to_vec);

    match route {
        RouteDecision::ReferenceFiltered | RouteDecision::ContextDependent => {
            if references.is_empty() {
                return Err(RetrievalError::MissingReferences {
                    route: route.as_str().to_string(),
                });
            }
            Ok(QueryObject::ReferenceFiltered {
                references: references.to_vec(),
                vector,
                size: config.reference_size,
            })
        }
        RouteDecision::Handbook => Ok(QueryObject::Handbook {
            scope: HANDBOOK_SCOPE.to_string(),
            vector,
            size: config.handbook_size,
        }),
        RouteDecision::ContentOnly => Ok(QueryObject::ContentOnly {
            match_text: match_text.trim().to_string(),
            fields: CONTENT_MATCH_FIELDS.iter().map(|f| f.to_string()).collect(),
            vector,
            size: config.content_size,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs() -> Vec<StandardReference> {
        vec!["NS 3457-7".into(), "NS 3457-8".into()]
    }

    #[test]
    fn reference_route_keeps_reference_order() {
        let q = build_query(
            RouteDecision::ReferenceFiltered,
            &refs(),
            "ignored",
            Some(&[0.1, 0.2]),
            &SearchConfig::default(),
        )
        .unwrap();
        assert_eq!(q.references(), refs().as_slice());
        assert_eq!(q.size(), 40);
        assert_eq!(q.vector(), Some(&[0.1, 0.2][..]));
    }

    #[test]
    fn context_dependent_without_references_is_rejected() {
        let err = build_query(
            RouteDecision::ContextDependent,
            &[],
            "q",
            None,
            &SearchConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, RetrievalError::MissingReferences { .. }));
    }

    #[test]
    fn handbook_ignores_references() {
        let q = build_query(RouteDecision::Handbook, &refs(), "q", None, &SearchConfig::default())
            .unwrap();
        assert!(matches!(q, QueryObject::Handbook { ref scope, size: 80, .. } if scope == HANDBOOK_SCOPE));
        assert!(q.references().is_empty());
    }

    #[test]
    fn empty_vector_means_text_only() {
        let q = build_query(RouteDecision::ContentOnly, &[], " tykkelse ", Some(&[]), &SearchConfig::default())
            .unwrap();
        assert_eq!(q.vector(), None);
        assert!(matches!(q, QueryObject::ContentOnly { ref match_text, size: 60, .. } if match_text == "tykkelse"));
    }
}
