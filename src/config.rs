//! TOML configuration.
//!
//! ```toml
//! [store]
//! backend = "sqlite"          # sqlite | rest | memory
//!
//! [store.sqlite]
//! path = "./data/kqa.sqlite"
//!
//! [store.rest]
//! url = "https://project.example.co"
//! table = "documents"
//! key_env = "KQA_SERVICE_KEY"
//! timeout_secs = 30
//!
//! [server]
//! bind = "0.0.0.0:5000"
//!
//! [limits]
//! max_content_chars = 10000
//! max_question_chars = 500
//! ```

use anyhow::{Context, Result};
use knowledge_qa_core::handlers::Limits;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub store: StoreConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub limits: Limits,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    #[serde(default = "default_backend")]
    pub backend: String,
    #[serde(default)]
    pub sqlite: Option<SqliteStoreConfig>,
    #[serde(default)]
    pub rest: Option<RestStoreConfig>,
}

fn default_backend() -> String {
    "sqlite".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct SqliteStoreConfig {
    pub path: PathBuf,
}

/// Managed database reached over a PostgREST-style HTTP API.
#[derive(Debug, Deserialize, Clone)]
pub struct RestStoreConfig {
    /// Project base URL; `/rest/v1/{table}` is appended.
    pub url: String,
    #[serde(default = "default_table")]
    pub table: String,
    /// Environment variable holding the service credential.
    #[serde(default = "default_key_env")]
    pub key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_table() -> String {
    "documents".to_string()
}
fn default_key_env() -> String {
    "KQA_SERVICE_KEY".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "0.0.0.0:5000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl Config {
    /// Parses and validates a configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).with_context(|| "Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    /// In-memory store with default limits; nothing survives the process.
    pub fn in_memory(bind: &str) -> Self {
        Self {
            store: StoreConfig {
                backend: "memory".to_string(),
                sqlite: None,
                rest: None,
            },
            server: ServerConfig {
                bind: bind.to_string(),
            },
            limits: Limits::default(),
        }
    }

    fn validate(&self) -> Result<()> {
        match self.store.backend.as_str() {
            "sqlite" => {
                if self.store.sqlite.is_none() {
                    anyhow::bail!("store.sqlite.path must be set when backend is 'sqlite'");
                }
            }
            "rest" => {
                let rest = self
                    .store
                    .rest
                    .as_ref()
                    .ok_or_else(|| anyhow::anyhow!("[store.rest] must be set when backend is 'rest'"))?;
                if !(rest.url.starts_with("http://") || rest.url.starts_with("https://")) {
                    anyhow::bail!("store.rest.url must be an http(s) URL, got '{}'", rest.url);
                }
                if rest.table.trim().is_empty() {
                    anyhow::bail!("store.rest.table must not be empty");
                }
                if rest.timeout_secs == 0 {
                    anyhow::bail!("store.rest.timeout_secs must be > 0");
                }
            }
            "memory" => {}
            other => anyhow::bail!(
                "Unknown store backend: '{}'. Must be sqlite, rest, or memory.",
                other
            ),
        }

        if self.limits.max_content_chars == 0 {
            anyhow::bail!("limits.max_content_chars must be > 0");
        }
        if self.limits.max_question_chars == 0 {
            anyhow::bail!("limits.max_question_chars must be > 0");
        }

        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    Config::from_toml(&content)
}
