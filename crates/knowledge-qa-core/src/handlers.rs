//! Request handlers.
//!
//! Each handler is an async function from a decoded request to a structured
//! response, taking the store explicitly. Transports (the axum server and
//! the CLI) decode input, call a handler, and render the `Result`.
//!
//! # Ingest
//!
//! 1. `title` and `content` must be present and non-blank; both are trimmed.
//! 2. Content longer than [`Limits::max_content_chars`] is rejected.
//! 3. One [`Store::insert`] call; its failure is a storage error.
//!
//! # Query
//!
//! 1. `question` must be non-blank; it is trimmed, capped at
//!    [`Limits::max_question_chars`], and lowercased into the search term.
//! 2. [`Store::count`] is best-effort: a failure is logged and reported as 0.
//! 3. [`Store::search`] for up to [`MAX_MATCHES`] documents; failure is fatal.
//! 4. The answer is built from the most recent match (see [`crate::answer`]).

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::answer::{build_answer, suggestions, MAX_MATCHES};
use crate::error::ApiError;
use crate::messages;
use crate::models::{Document, NewDocument};
use crate::snippet::leading_excerpt;
use crate::store::Store;
use crate::validate::required_field;

/// Input size limits, configurable under `[limits]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Limits {
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,
    #[serde(default = "default_max_question_chars")]
    pub max_question_chars: usize,
}

fn default_max_content_chars() -> usize {
    10_000
}
fn default_max_question_chars() -> usize {
    500
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_content_chars: default_max_content_chars(),
            max_question_chars: default_max_question_chars(),
        }
    }
}

// ============ Ingest ============

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngestRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestResponse {
    pub status: &'static str,
    pub message: String,
    pub document: StoredDocument,
}

/// Identifying metadata of a newly stored document.
#[derive(Debug, Clone, Serialize)]
pub struct StoredDocument {
    pub id: String,
    pub title: String,
    pub content_length: usize,
    pub created_at: String,
}

pub async fn ingest(
    store: &dyn Store,
    limits: &Limits,
    req: IngestRequest,
) -> Result<IngestResponse, ApiError> {
    let title = required_field(req.title.as_deref(), messages::TITLE_REQUIRED)?;
    let content = required_field(req.content.as_deref(), messages::CONTENT_REQUIRED)?;

    if content.chars().count() > limits.max_content_chars {
        return Err(ApiError::validation(messages::content_too_long(
            limits.max_content_chars,
        )));
    }

    let new_doc = NewDocument {
        title: title.to_string(),
        content: content.to_string(),
    };

    let stored = store.insert(&new_doc).await.map_err(|e| {
        tracing::error!(error = %e, "document insert failed");
        ApiError::storage(messages::STORE_WRITE_FAILED, e)
    })?;

    let content_length = stored.content_length();
    tracing::info!(id = %stored.id, content_length, "document stored");

    Ok(IngestResponse {
        status: "success",
        message: messages::UPLOAD_OK.to_string(),
        document: StoredDocument {
            id: stored.id,
            title: stored.title,
            content_length,
            created_at: stored.created_at.to_rfc3339(),
        },
    })
}

// ============ Query ============

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub question: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub answer: String,
    pub matched_count: usize,
    pub total_documents: u64,
    pub suggestions: Vec<String>,
    pub response_time: String,
}

pub async fn query(
    store: &dyn Store,
    limits: &Limits,
    req: QueryRequest,
) -> Result<QueryResponse, ApiError> {
    let question = required_field(req.question.as_deref(), messages::QUESTION_REQUIRED)?;
    let question: String = question.chars().take(limits.max_question_chars).collect();
    let search_term = question.trim_end().to_lowercase();

    let total_documents = match store.count().await {
        Ok(n) => n,
        Err(e) => {
            tracing::warn!(error = %e, "document count failed, reporting 0");
            0
        }
    };

    let mut matches = store
        .search(&search_term, MAX_MATCHES)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "document search failed");
            ApiError::storage(messages::STORE_READ_FAILED, e)
        })?;
    matches.truncate(MAX_MATCHES);

    let answer = build_answer(&matches, &search_term, total_documents);
    tracing::debug!(
        matched = matches.len(),
        total_documents,
        "query answered"
    );

    Ok(QueryResponse {
        answer,
        matched_count: matches.len(),
        total_documents,
        suggestions: suggestions(!matches.is_empty()),
        response_time: Utc::now().to_rfc3339(),
    })
}

// ============ Listing & status ============

/// Number of characters shown in a listing preview.
pub const PREVIEW_CHARS: usize = 100;
/// Most documents returned by one listing.
pub const LIST_LIMIT: usize = 100;

#[derive(Debug, Clone, Serialize)]
pub struct DocumentSummary {
    pub id: String,
    pub title: String,
    pub content_preview: String,
    pub length: usize,
    pub created_at: String,
}

impl From<&Document> for DocumentSummary {
    fn from(doc: &Document) -> Self {
        let chars: Vec<char> = doc.content.chars().collect();
        Self {
            id: doc.id.clone(),
            title: doc.title.clone(),
            content_preview: leading_excerpt(&chars, PREVIEW_CHARS),
            length: chars.len(),
            created_at: doc.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentList {
    pub count: usize,
    pub documents: Vec<DocumentSummary>,
}

pub async fn list_documents(store: &dyn Store) -> Result<DocumentList, ApiError> {
    let docs = store
        .list_recent(LIST_LIMIT)
        .await
        .map_err(|e| ApiError::storage(messages::STORE_READ_FAILED, e))?;
    let documents: Vec<DocumentSummary> = docs.iter().map(DocumentSummary::from).collect();
    Ok(DocumentList {
        count: documents.len(),
        documents,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub documents_count: u64,
    pub limits: Limits,
}

pub async fn status(store: &dyn Store, limits: &Limits) -> Result<StatusResponse, ApiError> {
    let documents_count = store
        .count()
        .await
        .map_err(|e| ApiError::storage(messages::STORE_READ_FAILED, e))?;
    Ok(StatusResponse {
        documents_count,
        limits: limits.clone(),
    })
}
