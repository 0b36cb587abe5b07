use anyhow::{bail, Result};

use crate::config::Config;
use crate::db;

/// Creates the SQLite schema. Safe to run repeatedly.
///
/// Only the `sqlite` backend has a local schema; the REST backend's table
/// is owned by the remote service.
pub async fn run_migrations(config: &Config) -> Result<()> {
    let sqlite = match (config.store.backend.as_str(), &config.store.sqlite) {
        ("sqlite", Some(sqlite)) => sqlite,
        (backend, _) => bail!(
            "init only applies to the sqlite backend (configured backend: '{}')",
            backend
        ),
    };

    let pool = db::connect(&sqlite.path).await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS documents (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            title_lower TEXT NOT NULL,
            content_lower TEXT NOT NULL,
            created_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(&pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_documents_created_at ON documents(created_at DESC)",
    )
    .execute(&pool)
    .await?;

    pool.close().await;
    tracing::info!(path = %sqlite.path.display(), "sqlite schema ready");
    Ok(())
}
