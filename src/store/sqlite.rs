//! SQLite-backed [`Store`] implementation.
//!
//! Documents live in a single `documents` table created by
//! [`crate::migrate::run_migrations`]. `created_at` is stored as Unix
//! microseconds so ordering survives rapid successive inserts; ties fall
//! back to `rowid`.
//!
//! Matching runs against `title_lower` / `content_lower`, which hold the
//! Unicode lowercase of each field computed at insert time. SQLite's own
//! `lower()` only folds ASCII and is not used.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use knowledge_qa_core::models::{Document, NewDocument};
use knowledge_qa_core::store::Store;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Escapes `LIKE` wildcards so the term matches literally (escape char `\`).
pub(crate) fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn row_to_document(row: &SqliteRow) -> Result<Document> {
    let micros: i64 = row.get("created_at");
    let created_at = DateTime::<Utc>::from_timestamp_micros(micros)
        .with_context(|| format!("invalid created_at value: {}", micros))?;
    Ok(Document {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        created_at,
    })
}

#[async_trait]
impl Store for SqliteStore {
    async fn insert(&self, doc: &NewDocument) -> Result<Document> {
        let stored = Document {
            id: uuid::Uuid::new_v4().to_string(),
            title: doc.title.clone(),
            content: doc.content.clone(),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO documents (id, title, content, title_lower, content_lower, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&stored.id)
        .bind(&stored.title)
        .bind(&stored.content)
        .bind(stored.title.to_lowercase())
        .bind(stored.content.to_lowercase())
        .bind(stored.created_at.timestamp_micros())
        .execute(&self.pool)
        .await?;

        Ok(stored)
    }

    async fn count(&self) -> Result<u64> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents")
            .fetch_one(&self.pool)
            .await?;
        Ok(n.max(0) as u64)
    }

    async fn search(&self, term: &str, limit: usize) -> Result<Vec<Document>> {
        let pattern = like_pattern(&term.to_lowercase());
        let rows = sqlx::query(
            r#"
            SELECT id, title, content, created_at
            FROM documents
            WHERE title_lower LIKE ? ESCAPE '\'
               OR content_lower LIKE ? ESCAPE '\'
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?
            "#,
        )
        .bind(&pattern)
        .bind(&pattern)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_document).collect()
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Document>> {
        let rows = sqlx::query(
            "SELECT id, title, content, created_at FROM documents ORDER BY created_at DESC, rowid DESC LIMIT ?",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_document).collect()
    }
}
