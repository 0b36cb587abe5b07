//! CLI command implementations.
//!
//! Each command opens the configured store, runs the same handler the HTTP
//! server uses, and prints the JSON result. Handler errors are printed as
//! their JSON error body on stderr and exit the process with status 1.

use anyhow::Result;
use serde::Serialize;

use knowledge_qa_core::error::ApiError;
use knowledge_qa_core::handlers::{self, IngestRequest, QueryRequest};

use crate::config::Config;
use crate::store;

fn print_outcome<T: Serialize>(outcome: Result<T, ApiError>) -> Result<()> {
    match outcome {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", serde_json::to_string_pretty(&e.body())?);
            std::process::exit(1);
        }
    }
}

pub async fn run_upload(config: &Config, title: String, content: String) -> Result<()> {
    let store = store::open_store(config).await?;
    let req = IngestRequest {
        title: Some(title),
        content: Some(content),
    };
    print_outcome(handlers::ingest(store.as_ref(), &config.limits, req).await)
}

pub async fn run_ask(config: &Config, question: String) -> Result<()> {
    let store = store::open_store(config).await?;
    let req = QueryRequest {
        question: Some(question),
    };
    print_outcome(handlers::query(store.as_ref(), &config.limits, req).await)
}

pub async fn run_documents(config: &Config) -> Result<()> {
    let store = store::open_store(config).await?;
    print_outcome(handlers::list_documents(store.as_ref()).await)
}

pub async fn run_status(config: &Config) -> Result<()> {
    let store = store::open_store(config).await?;
    print_outcome(handlers::status(store.as_ref(), &config.limits).await)
}
