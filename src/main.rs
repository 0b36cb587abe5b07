//! # Knowledge QA CLI (`kqa`)
//!
//! ## Usage
//!
//! ```bash
//! kqa --config ./config/kqa.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `kqa init` | Create the SQLite schema |
//! | `kqa serve` | Start the HTTP server |
//! | `kqa upload --title T --content C` | Store a document |
//! | `kqa ask "<question>"` | Answer a question from stored documents |
//! | `kqa documents` | List the most recent documents |
//! | `kqa status` | Show the document count and input limits |
//!
//! Log verbosity follows `RUST_LOG` (default `info`); logs go to stderr.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use knowledge_qa::{commands, config, migrate, server};

/// Knowledge QA: store short text documents and answer questions about them.
#[derive(Parser)]
#[command(
    name = "kqa",
    about = "Knowledge QA: store short text documents and answer questions about them",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/kqa.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the SQLite schema.
    ///
    /// Idempotent. Only valid for the `sqlite` backend.
    Init,

    /// Start the HTTP server.
    ///
    /// Binds to `[server].bind` and serves the ingest and query endpoints.
    Serve,

    /// Store a document.
    Upload {
        /// Document title.
        #[arg(long)]
        title: String,

        /// Document content.
        #[arg(long)]
        content: String,
    },

    /// Ask a question.
    Ask {
        /// The question text; matched as a case-insensitive substring.
        question: String,
    },

    /// List the most recent documents.
    Documents,

    /// Show the document count and input limits.
    Status,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Upload { title, content } => {
            commands::run_upload(&cfg, title, content).await?;
        }
        Commands::Ask { question } => {
            commands::run_ask(&cfg, question).await?;
        }
        Commands::Documents => {
            commands::run_documents(&cfg).await?;
        }
        Commands::Status => {
            commands::run_status(&cfg).await?;
        }
    }

    Ok(())
}
