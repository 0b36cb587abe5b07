//! HTTP server.
//!
//! Exposes the ingest and query handlers, plus a few read-only service
//! endpoints, as a JSON API.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/ingest` (alias `/upload`) | Store a `{title, content}` document |
//! | `POST` | `/query` (alias `/ask`) | Answer a `{question}` |
//! | `GET`  | `/` | Service info and endpoint list |
//! | `GET`  | `/health` | Health check (returns version) |
//! | `GET`  | `/status` | Document count and input limits |
//! | `GET`  | `/documents` | Most recent documents with previews |
//!
//! # Error Contract
//!
//! Every error is a JSON body:
//!
//! ```json
//! { "error": "问题不能为空", "status": "failed" }
//! ```
//!
//! `status` is `failed` for validation (400), wrong method (405), and store
//! failures (500); `error` for unexpected failures (500). A panic inside
//! the query route additionally carries a `suggestion`. Unknown paths
//! return 404 with the list of available endpoints.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so browser clients can
//! call the API directly.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, MethodRouter},
    Json, Router,
};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};

use knowledge_qa_core::error::ApiError;
use knowledge_qa_core::handlers::{
    self, DocumentList, IngestRequest, IngestResponse, QueryRequest, QueryResponse,
    StatusResponse,
};
use knowledge_qa_core::messages;

use crate::config::Config;
use crate::store::{self, Store};

const ENDPOINTS: [&str; 8] = [
    "GET /",
    "GET /health",
    "GET /status",
    "GET /documents",
    "POST /ingest",
    "POST /upload",
    "POST /query",
    "POST /ask",
];

/// Shared state handed to every route via Axum's `State` extractor.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    store: Arc<dyn Store>,
}

/// Starts the server with the store selected in `[store]`.
///
/// The store is constructed once here and shared by all requests.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let store = store::open_store(config).await?;
    run_server_with_store(config, store).await
}

/// Starts the server against an already-constructed store.
///
/// Binds to `[server].bind` and runs until the process is terminated.
pub async fn run_server_with_store(config: &Config, store: Arc<dyn Store>) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let app = router(config, store);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(
        addr = %bind_addr,
        backend = %config.store.backend,
        "knowledge QA server listening"
    );
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the application router.
pub fn router(config: &Config, store: Arc<dyn Store>) -> Router {
    let state = AppState {
        config: Arc::new(config.clone()),
        store,
    };

    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    Router::new()
        .route("/", get(handle_home))
        .route("/health", get(handle_health))
        .route("/status", get(handle_status))
        .route("/documents", get(handle_documents))
        .route("/ingest", ingest_route())
        .route("/upload", ingest_route())
        .route("/query", query_route())
        .route("/ask", query_route())
        .fallback(handle_not_found)
        .layer(cors)
        .with_state(state)
}

fn ingest_route() -> MethodRouter<AppState> {
    post(handle_ingest)
        .fallback(handle_method_not_allowed)
        .layer(CatchPanicLayer::custom(ingest_panic))
}

fn query_route() -> MethodRouter<AppState> {
    post(handle_query)
        .fallback(handle_method_not_allowed)
        .layer(CatchPanicLayer::custom(query_panic))
}

// ============ Error response ============

/// Wraps [`ApiError`] so it can be returned from Axum handlers.
struct HttpError(ApiError);

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        HttpError(err)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.0.body())).into_response()
    }
}

fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| ct.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
        })
        .unwrap_or(false)
}

/// Decodes a JSON request body.
///
/// A body that is absent, blank, or not declared as JSON is reported as
/// empty; a JSON body that does not parse into `T` is reported as invalid.
/// Parser details are logged, never returned to the client.
fn decode_body<T: DeserializeOwned>(headers: &HeaderMap, body: &Bytes) -> Result<T, HttpError> {
    if !is_json_content_type(headers) || body.iter().all(u8::is_ascii_whitespace) {
        return Err(HttpError(ApiError::validation(messages::EMPTY_BODY)));
    }
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, "request body rejected");
        HttpError(ApiError::validation(messages::INVALID_BODY))
    })
}

fn panic_detail(err: &(dyn Any + Send)) -> String {
    if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    }
}

fn ingest_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic_detail(err.as_ref());
    tracing::error!(panic = %detail, "ingest handler panicked");
    HttpError(ApiError::internal(
        format!("{}: {}", messages::UPLOAD_FAILED, detail),
        None,
    ))
    .into_response()
}

fn query_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic_detail(err.as_ref());
    tracing::error!(panic = %detail, "query handler panicked");
    HttpError(ApiError::internal(
        format!("{}: {}", messages::QUERY_FAILED, detail),
        Some(messages::RETRY_LATER),
    ))
    .into_response()
}

async fn handle_method_not_allowed() -> HttpError {
    HttpError(ApiError::MethodNotAllowed)
}

#[derive(Serialize)]
struct NotFoundBody {
    error: &'static str,
    status: u16,
    available_endpoints: Vec<&'static str>,
}

async fn handle_not_found() -> (StatusCode, Json<NotFoundBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundBody {
            error: messages::NOT_FOUND,
            status: 404,
            available_endpoints: ENDPOINTS.to_vec(),
        }),
    )
}

// ============ POST /ingest ============

async fn handle_ingest(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<IngestResponse>, HttpError> {
    let req: IngestRequest = decode_body(&headers, &body)?;
    let resp = handlers::ingest(state.store.as_ref(), &state.config.limits, req).await?;
    Ok(Json(resp))
}

// ============ POST /query ============

async fn handle_query(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<QueryResponse>, HttpError> {
    let req: QueryRequest = decode_body(&headers, &body)?;
    let resp = handlers::query(state.store.as_ref(), &state.config.limits, req).await?;
    Ok(Json(resp))
}

// ============ GET / ============

#[derive(Serialize)]
struct HomeResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    timestamp: String,
    endpoints: Vec<&'static str>,
}

async fn handle_home() -> Json<HomeResponse> {
    Json(HomeResponse {
        status: "online",
        service: "知识库问答系统 API",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now().to_rfc3339(),
        endpoints: ENDPOINTS.to_vec(),
    })
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    backend: String,
    timestamp: String,
}

async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        backend: state.config.store.backend.clone(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

// ============ GET /status ============

async fn handle_status(State(state): State<AppState>) -> Result<Json<StatusResponse>, HttpError> {
    let resp = handlers::status(state.store.as_ref(), &state.config.limits).await?;
    Ok(Json(resp))
}

// ============ GET /documents ============

async fn handle_documents(State(state): State<AppState>) -> Result<Json<DocumentList>, HttpError> {
    let resp = handlers::list_documents(state.store.as_ref()).await?;
    Ok(Json(resp))
}
