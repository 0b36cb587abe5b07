//! # Knowledge QA Core
//!
//! Runtime-independent logic for Knowledge QA: the document model, the
//! store abstraction, input validation, snippet extraction, and the
//! request handlers that turn validated input into structured responses.
//!
//! This crate contains no tokio, sqlx, HTTP server, or other native-only
//! dependencies. The application crate supplies concrete [`store::Store`]
//! implementations and the transport (axum routes, CLI).
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`models`] | Document types |
//! | [`store`] | Storage trait and in-memory backend |
//! | [`validate`] | Presence and non-empty predicates |
//! | [`snippet`] | Keyword-window snippet extraction |
//! | [`answer`] | Answer text and suggestion construction |
//! | [`handlers`] | Ingest, query, listing, and status handlers |
//! | [`error`] | HTTP-facing error taxonomy |
//! | [`messages`] | User-facing (localized) strings |

pub mod answer;
pub mod error;
pub mod handlers;
pub mod messages;
pub mod models;
pub mod snippet;
pub mod store;
pub mod validate;
