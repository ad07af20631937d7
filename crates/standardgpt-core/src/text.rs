//! Small text helpers shared by memory rendering and fragment formatting.

/// Cut `s` to at most `max_chars` characters, appending `...` when cut.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        None => s.to_string(),
        Some((byte_idx, _)) => format!("{}...", &s[..byte_idx]),
    }
}

/// Number of characters (not bytes).
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("æøå æøå", 3), "æøå...");
        assert_eq!(truncate_chars("kort", 10), "kort");
        assert_eq!(truncate_chars("abc", 3), "abc");
    }

    #[test]
    fn whitespace_collapses() {
        assert_eq!(normalize_whitespace("  NS \t 3457-9\n2021 "), "NS 3457-9 2021");
    }
}
