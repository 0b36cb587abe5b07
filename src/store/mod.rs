//! Concrete [`Store`] backends and backend selection.
//!
//! | Backend | Type | Notes |
//! |---------|------|-------|
//! | `sqlite` | [`SqliteStore`] | Local file, schema created by `kqa init` |
//! | `rest` | [`RestStore`] | Managed database behind a PostgREST-style API |
//! | `memory` | [`InMemoryStore`] | Process-local, for demos and tests |

pub mod rest;
pub mod sqlite;

use anyhow::{Context, Result};
use std::sync::Arc;

pub use knowledge_qa_core::store::{InMemoryStore, Store};
pub use rest::RestStore;
pub use sqlite::SqliteStore;

use crate::config::Config;
use crate::db;

/// Builds the configured store. Called once per process; the returned
/// handle is shared by every request.
pub async fn open_store(config: &Config) -> Result<Arc<dyn Store>> {
    let store: Arc<dyn Store> = match config.store.backend.as_str() {
        "sqlite" => {
            let sqlite = config
                .store
                .sqlite
                .as_ref()
                .context("store.sqlite.path is not configured")?;
            let pool = db::connect(&sqlite.path).await?;
            Arc::new(SqliteStore::new(pool))
        }
        "rest" => {
            let rest = config
                .store
                .rest
                .as_ref()
                .context("[store.rest] is not configured")?;
            Arc::new(RestStore::from_config(rest)?)
        }
        "memory" => Arc::new(InMemoryStore::new()),
        other => anyhow::bail!("Unknown store backend: '{}'", other),
    };

    tracing::debug!(backend = %config.store.backend, "store opened");
    Ok(store)
}
