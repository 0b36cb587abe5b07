//! Answer construction for the query handler.
//!
//! The answer is built from the primary (most recent) matching document
//! only. Without matches, it falls back to a message that reports how many
//! documents exist, or to the fixed empty-knowledge-base message.

use crate::messages;
use crate::models::Document;
use crate::snippet::extract_snippet;

/// Upper bound on the matches requested from the store per query.
pub const MAX_MATCHES: usize = 5;

/// Builds the answer text for `search_term` given the store's matches
/// (most recent first) and the total document count.
pub fn build_answer(matches: &[Document], search_term: &str, total_documents: u64) -> String {
    match matches.first() {
        Some(primary) => {
            let snippet = extract_snippet(&primary.content, search_term);
            messages::matched_answer(&primary.title, &snippet)
        }
        None if total_documents > 0 => messages::no_match_answer(search_term, total_documents),
        None => messages::EMPTY_KNOWLEDGE_BASE.to_string(),
    }
}

pub fn suggestions(has_matches: bool) -> Vec<String> {
    if has_matches {
        messages::MATCH_SUGGESTIONS.iter().map(|s| s.to_string()).collect()
    } else {
        messages::NO_MATCH_SUGGESTIONS.iter().map(|s| s.to_string()).collect()
    }
}
