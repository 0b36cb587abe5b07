//! # Knowledge QA
//!
//! A small knowledge-base service: clients upload short text documents and
//! ask questions that are answered by case-insensitive substring search
//! over those documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌─────────────────────┐   ┌──────────────────┐
//! │ HTTP API │──▶│      handlers       │──▶│      Store       │
//! │   CLI    │   │ validate → store →  │   │ SQLite / REST /  │
//! └──────────┘   │ answer + snippet    │   │ in-memory        │
//!                └─────────────────────┘   └──────────────────┘
//! ```
//!
//! The handlers, snippet extraction, and the [`Store`](store::Store) trait
//! live in `knowledge-qa-core`; this crate adds configuration, the concrete
//! backends, the axum server, and the `kqa` CLI.
//!
//! ## Quick Start
//!
//! ```bash
//! kqa init                                      # create the SQLite schema
//! kqa upload --title "部署指南" --content "..."  # store a document
//! kqa ask "部署"                                 # query it
//! kqa serve                                     # start the HTTP server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`db`] | SQLite connection |
//! | [`migrate`] | Schema migrations |
//! | [`store`] | SQLite, REST, and in-memory store backends |
//! | [`server`] | HTTP server |
//! | [`commands`] | CLI command implementations |

pub mod commands;
pub mod config;
pub mod db;
pub mod migrate;
pub mod server;
pub mod store;
