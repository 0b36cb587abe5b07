//! Storage abstraction for Knowledge QA.
//!
//! The [`Store`] trait covers every call the handlers make against the
//! document store, so the same handler code runs against SQLite, a remote
//! managed database, or the in-memory backend used in tests.
//!
//! Implementations must be `Send + Sync` to be shared across request tasks.
//! Each method is a single remote (or local) call; atomicity of an insert
//! and consistency of each read are the backend's responsibility.
//!
//! # Operations
//!
//! | Method | Purpose |
//! |--------|---------|
//! | [`insert`](Store::insert) | Create a document, returning the stored record |
//! | [`count`](Store::count) | Total number of documents |
//! | [`search`](Store::search) | Case-insensitive substring match on title or content |
//! | [`list_recent`](Store::list_recent) | Most recently created documents |

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Document, NewDocument};

pub use memory::InMemoryStore;

#[async_trait]
pub trait Store: Send + Sync {
    /// Inserts a document and returns it with its store-assigned `id` and
    /// `created_at`.
    async fn insert(&self, doc: &NewDocument) -> Result<Document>;

    /// Counts all documents.
    async fn count(&self) -> Result<u64>;

    /// Returns up to `limit` documents whose title or content contains
    /// `term` case-insensitively, ordered by `created_at` descending.
    async fn search(&self, term: &str, limit: usize) -> Result<Vec<Document>>;

    /// Returns up to `limit` documents ordered by `created_at` descending.
    async fn list_recent(&self, limit: usize) -> Result<Vec<Document>>;
}
