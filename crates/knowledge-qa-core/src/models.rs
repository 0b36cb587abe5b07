//! Document types exchanged with the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A document as persisted by the store.
///
/// `id` and `created_at` are assigned by the store on insertion; this
/// system never updates or deletes a document once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Document {
    /// Character (Unicode scalar) count of the content.
    pub fn content_length(&self) -> usize {
        self.content.chars().count()
    }
}

/// A validated, trimmed document ready for insertion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewDocument {
    pub title: String,
    pub content: String,
}
