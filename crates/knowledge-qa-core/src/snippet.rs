//! Keyword-window snippet extraction.
//!
//! Given a document's content and a lowercased search term, the snippet is
//! a window around the first case-insensitive occurrence of the term:
//!
//! ```text
//! start = max(0, i - 100)
//! end   = min(len, i + len(term) + 200)
//! ```
//!
//! prefixed with `...` when `start > 0` and suffixed with `...` when
//! `end < len`. When the term does not occur in the content (the document
//! matched on its title), the first 300 characters are used instead.
//!
//! All offsets count Unicode scalar values, never bytes, so windows never
//! split a multi-byte character.

/// Characters kept before the occurrence.
pub const SNIPPET_CONTEXT_BEFORE: usize = 100;
/// Characters kept after the end of the occurrence.
pub const SNIPPET_CONTEXT_AFTER: usize = 200;
/// Length of the leading excerpt used when the term is not in the content.
pub const SNIPPET_FALLBACK_LEN: usize = 300;
pub const ELLIPSIS: &str = "...";

/// Location of a match inside a character slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    /// Index of the first matched character.
    pub start: usize,
    /// Number of content characters covered by the match.
    pub len: usize,
}

/// Finds the first case-insensitive occurrence of `term` in `haystack`.
///
/// Each content character is lowercased before comparison. A character
/// whose lowercase form expands to several characters (e.g. `İ`) must match
/// all of them, so `len` may be shorter than the term's character count.
pub fn find_case_insensitive(haystack: &[char], term: &str) -> Option<Occurrence> {
    let needle: Vec<char> = term.chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() {
        return None;
    }
    (0..haystack.len()).find_map(|start| {
        match_len_at(haystack, start, &needle).map(|len| Occurrence { start, len })
    })
}

fn match_len_at(haystack: &[char], start: usize, needle: &[char]) -> Option<usize> {
    let mut matched = 0;
    let mut consumed = 0;
    while matched < needle.len() {
        let c = *haystack.get(start + consumed)?;
        for lower in c.to_lowercase() {
            if needle.get(matched) != Some(&lower) {
                return None;
            }
            matched += 1;
        }
        consumed += 1;
    }
    Some(consumed)
}

/// Builds the snippet shown in an answer for `content` and `search_term`.
pub fn extract_snippet(content: &str, search_term: &str) -> String {
    let chars: Vec<char> = content.chars().collect();

    match find_case_insensitive(&chars, search_term) {
        Some(occ) => {
            let start = occ.start.saturating_sub(SNIPPET_CONTEXT_BEFORE);
            let end = (occ.start + occ.len + SNIPPET_CONTEXT_AFTER).min(chars.len());

            let mut snippet = String::new();
            if start > 0 {
                snippet.push_str(ELLIPSIS);
            }
            snippet.extend(&chars[start..end]);
            if end < chars.len() {
                snippet.push_str(ELLIPSIS);
            }
            snippet
        }
        None => leading_excerpt(&chars, SNIPPET_FALLBACK_LEN),
    }
}

/// First `max_chars` characters, with a trailing ellipsis iff truncated.
pub fn leading_excerpt(chars: &[char], max_chars: usize) -> String {
    let mut excerpt: String = chars.iter().take(max_chars).collect();
    if chars.len() > max_chars {
        excerpt.push_str(ELLIPSIS);
    }
    excerpt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let occ = find_case_insensitive(&chars("Hello Rust World"), "rust").unwrap();
        assert_eq!(occ, Occurrence { start: 6, len: 4 });
    }

    #[test]
    fn test_find_returns_first_occurrence() {
        let occ = find_case_insensitive(&chars("ab AB ab"), "ab").unwrap();
        assert_eq!(occ.start, 0);
    }

    #[test]
    fn test_find_missing_and_empty_term() {
        assert!(find_case_insensitive(&chars("nothing here"), "absent").is_none());
        assert!(find_case_insensitive(&chars("anything"), "").is_none());
    }

    #[test]
    fn test_find_counts_chars_not_bytes() {
        let occ = find_case_insensitive(&chars("数据库系统的设计"), "系统").unwrap();
        assert_eq!(occ, Occurrence { start: 3, len: 2 });
    }

    #[test]
    fn test_find_expanding_lowercase() {
        // 'İ' lowercases to "i\u{307}"
        let occ = find_case_insensitive(&chars("xİy"), "i\u{307}y").unwrap();
        assert_eq!(occ, Occurrence { start: 1, len: 2 });
    }

    #[test]
    fn test_snippet_windows_both_sides() {
        let content = format!("{}KEYWORD{}", "A".repeat(120), "B".repeat(400));
        let snippet = extract_snippet(&content, "keyword");

        assert!(snippet.starts_with(ELLIPSIS));
        assert!(snippet.ends_with(ELLIPSIS));
        assert!(snippet.contains("KEYWORD"));

        // 100 before + 7 term + 200 after, plus two ellipses.
        let body = &snippet[ELLIPSIS.len()..snippet.len() - ELLIPSIS.len()];
        assert_eq!(body.chars().count(), 307);
        assert!(body.starts_with(&"A".repeat(100)));
        assert!(body.ends_with(&"B".repeat(200)));
    }

    #[test]
    fn test_snippet_near_start_has_no_prefix() {
        let content = format!("intro keyword {}", "x".repeat(500));
        let snippet = extract_snippet(&content, "keyword");
        assert!(snippet.starts_with("intro keyword"));
        assert!(snippet.ends_with(ELLIPSIS));
    }

    #[test]
    fn test_snippet_whole_short_content() {
        let snippet = extract_snippet("Rust has ownership.", "ownership");
        assert_eq!(snippet, "Rust has ownership.");
    }

    #[test]
    fn test_snippet_exactly_at_window_edges() {
        // Occurrence at index 100 and exactly 200 chars after: no ellipses.
        let content = format!("{}kw{}", "a".repeat(100), "b".repeat(200));
        let snippet = extract_snippet(&content, "kw");
        assert_eq!(snippet, content);

        let content = format!("{}kw{}", "a".repeat(101), "b".repeat(201));
        let snippet = extract_snippet(&content, "kw");
        assert!(snippet.starts_with(ELLIPSIS) && snippet.ends_with(ELLIPSIS));
    }

    #[test]
    fn test_snippet_fallback_when_term_only_in_title() {
        let long = "c".repeat(350);
        let snippet = extract_snippet(&long, "title-word");
        assert_eq!(snippet, format!("{}{}", "c".repeat(300), ELLIPSIS));

        let exact = "d".repeat(300);
        assert_eq!(extract_snippet(&exact, "title-word"), exact);

        assert_eq!(extract_snippet("short body", "title-word"), "short body");
    }

    #[test]
    fn test_snippet_non_ascii_window() {
        let content = format!("{}关键词{}", "中".repeat(150), "文".repeat(300));
        let snippet = extract_snippet(&content, "关键词");
        let body = &snippet[ELLIPSIS.len()..snippet.len() - ELLIPSIS.len()];
        assert_eq!(body.chars().count(), 100 + 3 + 200);
        assert!(body.contains("关键词"));
    }
}
