//! Fragment formatting with a character budget.
//!
//! Fragments are packed in score order (the order the search engine returned
//! them) until the budget is spent; a fragment that does not fit ends the
//! packing, except the first, which is cut so the context is never empty.

use standardgpt_core::constants::NO_FRAGMENTS_TEXT;
use standardgpt_core::models::SearchHit;
use standardgpt_core::text::{char_len, truncate_chars};

const SEPARATOR: &str = "\n\n";

/// Rendered context plus how many fragments made it in.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedContext {
    pub text: String,
    pub included: usize,
    pub truncated: bool,
}

/// Render hits as numbered documents, bounded by `max_chars`.
pub fn format_fragments(hits: &[SearchHit], max_chars: usize) -> FormattedContext {
    if hits.is_empty() {
        return FormattedContext {
            text: NO_FRAGMENTS_TEXT.to_string(),
            included: 0,
            truncated: false,
        };
    }

    let mut text = String::new();
    let mut used = 0usize;
    let mut included = 0usize;
    let mut truncated = false;

    for (i, hit) in hits.iter().enumerate() {
        let block = render_hit(i + 1, hit);
        let sep = if included == 0 { 0 } else { SEPARATOR.len() };
        let block_len = char_len(&block);

        if used + sep + block_len > max_chars {
            truncated = true;
            if included == 0 {
                text = truncate_chars(&block, max_chars.saturating_sub(3));
                included = 1;
            }
            break;
        }

        if sep > 0 {
            text.push_str(SEPARATOR);
        }
        text.push_str(&block);
        used += sep + block_len;
        included += 1;
    }

    FormattedContext {
        text,
        included,
        truncated,
    }
}

fn render_hit(number: usize, hit: &SearchHit) -> String {
    let mut lines = vec![format!("Dokument {number} (score: {:.2}):", hit.score)];
    if !hit.reference.is_empty() {
        lines.push(format!("Referanse: {}", hit.reference));
    }
    if let Some(page) = hit.page.as_deref().filter(|p| !p.is_empty()) {
        lines.push(format!("Side: {page}"));
    }
    lines.push(format!("Innhold: {}", hit.text));
    lines.push("---".to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(reference: &str, text: &str) -> SearchHit {
        SearchHit {
            text: text.to_string(),
            score: 1.234,
            reference: reference.to_string(),
            page: None,
        }
    }

    #[test]
    fn empty_hits_render_fixed_sentence() {
        let ctx = format_fragments(&[], 100);
        assert_eq!(ctx.text, NO_FRAGMENTS_TEXT);
        assert_eq!(ctx.included, 0);
    }

    #[test]
    fn hit_layout() {
        let ctx = format_fragments(&[hit("NS 3420-1", "Prosesskoder.")], 1000);
        assert_eq!(
            ctx.text,
            "Dokument 1 (score: 1.23):\nReferanse: NS 3420-1\nInnhold: Prosesskoder.\n---"
        );
    }

    #[test]
    fn budget_cuts_on_fragment_boundary() {
        let hits = vec![hit("A-1", "x".repeat(50).as_str()), hit("A-2", "y".repeat(50).as_str())];
        let one = char_len(&render_hit(1, &hits[0]));
        let ctx = format_fragments(&hits, one + 5);
        assert_eq!(ctx.included, 1);
        assert!(ctx.truncated);
        assert!(!ctx.text.contains("Dokument 2"));
    }

    #[test]
    fn oversized_first_fragment_is_cut() {
        let hits = vec![hit("A-1", "z".repeat(500).as_str())];
        let ctx = format_fragments(&hits, 100);
        assert_eq!(ctx.included, 1);
        assert!(ctx.truncated);
        assert_eq!(char_len(&ctx.text), 100);
        assert!(ctx.text.ends_with("..."));
    }
}
