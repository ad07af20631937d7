//! Property tests for the standard-reference recognizer.

use proptest::prelude::*;

use standardgpt_routing::recognizer::extract_references;

fn series() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["NS", "NS-EN", "NS-EN ISO", "ISO", "EN", "NEK", "SN-TS"])
        .prop_map(str::to_string)
}

proptest! {
    #[test]
    fn prefixed_reference_is_always_found(
        series in series(),
        body in 100u32..99_999,
        part in prop::option::of(1u32..99),
        year in prop::option::of(1990u32..2030),
    ) {
        let mut reference = format!("{series} {body}");
        if let Some(part) = part {
            reference.push_str(&format!("-{part}"));
        }
        if let Some(year) = year {
            reference.push_str(&format!(":{year}"));
        }
        let text = format!("Hva sier {reference} om dette?");
        let found = extract_references(&text);
        prop_assert_eq!(found.len(), 1);
        prop_assert_eq!(found[0].as_str(), reference.as_str());
    }

    #[test]
    fn space_year_normalizes_to_colon(
        body in 1000u32..9_999,
        part in 1u32..99,
        year in 1990u32..2030,
    ) {
        let text = format!("NS {body}-{part} {year}");
        let found = extract_references(&text);
        prop_assert_eq!(found.len(), 1);
        let expected = format!("NS {body}-{part}:{year}");
        prop_assert_eq!(found[0].as_str(), expected.as_str());
    }

    #[test]
    fn extraction_is_stable(text in "[A-Za-z0-9 :\\-]{0,60}") {
        let first = extract_references(&text);
        let joined = first.iter().map(|r| r.as_str()).collect::<Vec<_>>().join(", ");
        let second = extract_references(&joined);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn never_panics_and_never_duplicates(text in "\\PC{0,120}") {
        let found = extract_references(&text);
        let mut seen = std::collections::HashSet::new();
        for r in &found {
            prop_assert!(seen.insert(r.as_str().to_string()));
        }
    }

    #[test]
    fn lowercase_prose_has_no_references(text in "[a-zæøå ,.]{0,80}") {
        prop_assert!(extract_references(&text).is_empty());
    }
}
