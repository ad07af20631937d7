//! Standard-reference recognizer.
//!
//! Finds identifier-like tokens such as `NS 3457-7`, `M-004:2018` or
//! `NS-EN ISO 9001:2015`. A year written after a space is joined with a
//! colon (`3457-9 2021` becomes `3457-9:2021`). Series letters match in any
//! case and keep the casing they were written in; a lowercase series word
//! counts only when it is a known series code (`ns`, `iso`, ...) or a single
//! letter followed by a dash (`m-004`). Pure; never fails.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use standardgpt_core::models::StandardReference;

static STANDARD_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        \b
        (?P<prefix>(?i:
            (?:[A-ZÆØÅ]{2,10}[\ \-]){0,3}   # leading series, e.g. NS- EN  ISO
            (?:[A-ZÆØÅ]{2,10}[\ \-]?|[A-ZÆØÅ]-)
        ))?
        (?P<body>\d{2,6})
        (?P<suffix>(?:-\d{1,4})*)
        (?P<year>(?::|\s+)(?:19|20)\d{2})?
        \b
        ",
    )
    .ok()
});

/// Series codes accepted when written in lowercase.
const LOWERCASE_SERIES: &[&str] = &[
    "ns", "en", "iso", "iec", "nek", "sn", "ts", "tr", "ds", "sfs", "din", "astm", "tek",
];

/// Ordered, deduplicated references in mention order.
pub fn extract_references(text: &str) -> Vec<StandardReference> {
    let Some(pattern) = STANDARD_PATTERN.as_ref() else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for caps in pattern.captures_iter(text) {
        let prefix = series_prefix(caps.name("prefix").map_or("", |m| m.as_str()));
        let body = caps.name("body").map_or("", |m| m.as_str());
        let suffix = caps.name("suffix").map_or("", |m| m.as_str());
        let year = caps.name("year").map(|m| m.as_str());

        // Bare numbers need a series-like shape to count.
        if prefix.is_empty() && (suffix.is_empty() || body.len() < 4) {
            continue;
        }

        let mut normalized = collapse_whitespace(prefix);
        normalized.push_str(body);
        normalized.push_str(suffix);
        if let Some(year) = year {
            normalized.push(':');
            normalized.push_str(year.trim_start_matches(|c: char| c == ':' || c.is_whitespace()));
        }

        if seen.insert(normalized.to_uppercase()) {
            out.push(StandardReference::new(normalized));
        }
    }
    out
}

pub fn contains_reference(text: &str) -> bool {
    !extract_references(text).is_empty()
}

/// Merge `more` into `into`, keeping first-mention order. References that
/// differ only in case count as the same.
pub fn merge_unique(into: &mut Vec<StandardReference>, more: impl IntoIterator<Item = StandardReference>) {
    for r in more {
        if !into.iter().any(|existing| existing.same_as(&r)) {
            into.push(r);
        }
    }
}

/// Drop prose words the case-insensitive prefix swallowed: walking left
/// from the number, stop at the first lowercase word that is not a series.
fn series_prefix(prefix: &str) -> &str {
    if !prefix.chars().any(char::is_lowercase) {
        return prefix;
    }
    let mut start = prefix.len();
    let mut rest = prefix.trim_end();
    while !rest.is_empty() {
        let token_start = rest.rfind(' ').map_or(0, |i| i + 1);
        if !is_series_token(&rest[token_start..]) {
            break;
        }
        start = token_start;
        rest = rest[..token_start].trim_end();
    }
    &prefix[start..]
}

fn is_series_token(token: &str) -> bool {
    if !token.chars().any(char::is_lowercase) {
        return true;
    }
    let parts: Vec<&str> = token.split('-').filter(|p| !p.is_empty()).collect();
    if parts.len() == 1 && token.ends_with('-') && parts[0].chars().count() == 1 {
        return true;
    }
    !parts.is_empty()
        && parts
            .iter()
            .all(|p| LOWERCASE_SERIES.contains(&p.to_lowercase().as_str()))
}

fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_space = false;
    for c in s.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}
