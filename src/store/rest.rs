//! [`Store`] backed by a managed database's PostgREST-style HTTP API.
//!
//! Every operation is a single request against `{url}/rest/v1/{table}`:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | insert | `POST` with `Prefer: return=representation` |
//! | count | `HEAD ?select=id` with `Prefer: count=exact`, read from `Content-Range` |
//! | search | `GET ?or=(title.ilike.*t*,content.ilike.*t*)&order=created_at.desc&limit=n` |
//! | list_recent | `GET ?order=created_at.desc&limit=n` |
//!
//! The service credential is read once from the environment variable named
//! by `store.rest.key_env` and sent as both `apikey` and a bearer token.
//! Failures are returned immediately; there is no retry.

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Method, RequestBuilder, Response};
use serde::Deserialize;
use std::time::Duration;

use knowledge_qa_core::models::{Document, NewDocument};
use knowledge_qa_core::store::Store;

use crate::config::RestStoreConfig;

const SELECT_COLUMNS: &str = "id,title,content,created_at";

pub struct RestStore {
    client: reqwest::Client,
    endpoint: String,
    service_key: String,
}

/// Row shape returned by the API. Ids may be numeric or textual.
#[derive(Debug, Deserialize)]
struct Row {
    id: serde_json::Value,
    title: String,
    content: String,
    created_at: DateTime<Utc>,
}

impl From<Row> for Document {
    fn from(row: Row) -> Self {
        let id = match row.id {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
        Document {
            id,
            title: row.title,
            content: row.content,
            created_at: row.created_at,
        }
    }
}

impl RestStore {
    pub fn from_config(config: &RestStoreConfig) -> Result<Self> {
        let service_key = std::env::var(&config.key_env)
            .map_err(|_| anyhow!("{} not set", config.key_env))?;
        Self::new(&config.url, &config.table, service_key, config.timeout_secs)
    }

    pub fn new(base_url: &str, table: &str, service_key: String, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/rest/v1/{}", base_url.trim_end_matches('/'), table),
            service_key,
        })
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.client
            .request(method, &self.endpoint)
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
    }

    async fn fetch_rows(&self, params: &[(&str, String)]) -> Result<Vec<Document>> {
        let resp = self.request(Method::GET).query(params).send().await?;
        let rows: Vec<Row> = check_status(resp).await?.json().await?;
        Ok(rows.into_iter().map(Document::from).collect())
    }
}

/// Turns a non-2xx response into an error carrying the API's message.
async fn check_status(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    bail!("store API error {}: {}", status, error_message(&body))
}

/// Extracts `message` from a PostgREST error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

/// Parses the total from a `Content-Range` header such as `0-24/3573` or `*/0`.
fn parse_content_range_total(header: &str) -> Result<u64> {
    let total = header
        .rsplit_once('/')
        .map(|(_, total)| total)
        .with_context(|| format!("malformed Content-Range: {}", header))?;
    total
        .parse::<u64>()
        .with_context(|| format!("Content-Range has no exact total: {}", header))
}

/// Builds the `or` filter matching `term` in title or content.
///
/// Values are double-quoted so commas and parentheses in the term do not
/// break the filter grammar; `*` is the API's `ilike` wildcard.
fn or_filter(term: &str) -> String {
    let mut quoted = String::with_capacity(term.len() + 4);
    for c in term.chars() {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    format!(
        "(title.ilike.\"*{q}*\",content.ilike.\"*{q}*\")",
        q = quoted
    )
}

#[async_trait]
impl Store for RestStore {
    async fn insert(&self, doc: &NewDocument) -> Result<Document> {
        let resp = self
            .request(Method::POST)
            .header("Prefer", "return=representation")
            .query(&[("select", SELECT_COLUMNS)])
            .json(doc)
            .send()
            .await?;
        let mut rows: Vec<Row> = check_status(resp).await?.json().await?;
        if rows.is_empty() {
            bail!("store API returned no row for the inserted document");
        }
        Ok(rows.swap_remove(0).into())
    }

    async fn count(&self) -> Result<u64> {
        let resp = self
            .request(Method::HEAD)
            .header("Prefer", "count=exact")
            .query(&[("select", "id")])
            .send()
            .await?;
        let resp = check_status(resp).await?;
        let header = resp
            .headers()
            .get("content-range")
            .context("store API response has no Content-Range header")?
            .to_str()?;
        parse_content_range_total(header)
    }

    async fn search(&self, term: &str, limit: usize) -> Result<Vec<Document>> {
        self.fetch_rows(&[
            ("select", SELECT_COLUMNS.to_string()),
            ("or", or_filter(term)),
            ("order", "created_at.desc".to_string()),
            ("limit", limit.to_string()),
        ])
        .await
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Document>> {
        self.fetch_rows(&[
            ("select", SELECT_COLUMNS.to_string()),
            ("order", "created_at.desc".to_string()),
            ("limit", limit.to_string()),
        ])
        .await
    }
}
