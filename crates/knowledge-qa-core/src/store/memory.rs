//! In-memory [`Store`] implementation for tests and throwaway servers.
//!
//! Documents live in a `Vec` behind `std::sync::RwLock`. Search is a linear
//! scan with Unicode-aware lowercasing.

use std::sync::RwLock;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;

use crate::models::{Document, NewDocument};

use super::Store;

pub struct InMemoryStore {
    docs: RwLock<Vec<Document>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(Vec::new()),
        }
    }

    /// Creates a store pre-populated with `docs`, keeping their ids and
    /// timestamps as given.
    pub fn with_documents(docs: Vec<Document>) -> Self {
        Self {
            docs: RwLock::new(docs),
        }
    }

    /// Documents newest first. Equal timestamps keep the later insertion first.
    fn newest_first<'a>(docs: impl DoubleEndedIterator<Item = &'a Document>) -> Vec<Document> {
        let mut out: Vec<Document> = docs.rev().cloned().collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn insert(&self, doc: &NewDocument) -> Result<Document> {
        let stored = Document {
            id: uuid::Uuid::new_v4().to_string(),
            title: doc.title.clone(),
            content: doc.content.clone(),
            created_at: Utc::now(),
        };
        let mut docs = self
            .docs
            .write()
            .map_err(|_| anyhow!("in-memory store lock poisoned"))?;
        docs.push(stored.clone());
        Ok(stored)
    }

    async fn count(&self) -> Result<u64> {
        let docs = self
            .docs
            .read()
            .map_err(|_| anyhow!("in-memory store lock poisoned"))?;
        Ok(docs.len() as u64)
    }

    async fn search(&self, term: &str, limit: usize) -> Result<Vec<Document>> {
        let term = term.to_lowercase();
        let docs = self
            .docs
            .read()
            .map_err(|_| anyhow!("in-memory store lock poisoned"))?;
        let mut matches = Self::newest_first(docs.iter().filter(|d| {
            d.title.to_lowercase().contains(&term) || d.content.to_lowercase().contains(&term)
        }));
        matches.truncate(limit);
        Ok(matches)
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Document>> {
        let docs = self
            .docs
            .read()
            .map_err(|_| anyhow!("in-memory store lock poisoned"))?;
        let mut recent = Self::newest_first(docs.iter());
        recent.truncate(limit);
        Ok(recent)
    }
}
