//! Error taxonomy for the request handlers.
//!
//! Every failure a handler can produce is an [`ApiError`]. The transport
//! layer renders it with [`ApiError::http_status`] and [`ApiError::body`];
//! nothing propagates past the handler boundary.
//!
//! | Variant | HTTP | `status` marker |
//! |---------|------|-----------------|
//! | `Validation` | 400 | `failed` |
//! | `MethodNotAllowed` | 405 | `failed` |
//! | `Storage` | 500 | `failed` |
//! | `Internal` | 500 | `error` |

use serde::Serialize;
use thiserror::Error;

use crate::messages;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Missing or malformed client input.
    #[error("{0}")]
    Validation(String),

    /// The endpoint does not accept the request method.
    #[error("{}", messages::METHOD_NOT_ALLOWED)]
    MethodNotAllowed,

    /// A call to the document store failed.
    #[error("{0}")]
    Storage(String),

    /// Anything unexpected. `suggestion` is a recovery hint for the client.
    #[error("{message}")]
    Internal {
        message: String,
        suggestion: Option<String>,
    },
}

/// JSON body of an error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    /// Wraps a store failure, prefixing the store's own message with `context`.
    pub fn storage(context: &str, err: impl std::fmt::Display) -> Self {
        ApiError::Storage(format!("{}: {}", context, err))
    }

    pub fn internal(message: impl Into<String>, suggestion: Option<&str>) -> Self {
        ApiError::Internal {
            message: message.into(),
            suggestion: suggestion.map(str::to_string),
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            ApiError::Validation(_) => 400,
            ApiError::MethodNotAllowed => 405,
            ApiError::Storage(_) | ApiError::Internal { .. } => 500,
        }
    }

    /// Machine-readable marker: `failed` for expected failures, `error` for
    /// unexpected ones.
    pub fn status_marker(&self) -> &'static str {
        match self {
            ApiError::Internal { .. } => "error",
            _ => "failed",
        }
    }

    pub fn body(&self) -> ErrorBody {
        let suggestion = match self {
            ApiError::Internal { suggestion, .. } => suggestion.clone(),
            _ => None,
        };
        ErrorBody {
            error: self.to_string(),
            status: self.status_marker(),
            suggestion,
        }
    }
}
