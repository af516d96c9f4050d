//! Typed error handling for the invoice ledger
//!
//! # Error Categories
//!
//! - [`StoreError`]: failures reported by a storage backend
//! - [`ConfigError`]: failures while loading process configuration
//! - [`ApiError`]: what an HTTP handler returns; always rendered as a
//!   `500` with an `{ "error": ... }` body
//!
//! Deleting an identifier that does not exist is not an error, so there is no
//! `NotFound` variant anywhere in this module.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias used by the store and sequence traits
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors reported by storage backends
///
/// The `Display` output is the raw backend message; it is what clients see.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backing store cannot be reached
    #[error("{message}")]
    Unavailable { backend: String, message: String },

    /// The store was reached but rejected the operation
    #[error("{message}")]
    Persistence { backend: String, message: String },
}

impl StoreError {
    pub fn unavailable(backend: impl Into<String>, message: impl Into<String>) -> Self {
        StoreError::Unavailable {
            backend: backend.into(),
            message: message.into(),
        }
    }

    pub fn persistence(backend: impl Into<String>, message: impl Into<String>) -> Self {
        StoreError::Persistence {
            backend: backend.into(),
            message: message.into(),
        }
    }

    pub fn backend(&self) -> &str {
        match self {
            StoreError::Unavailable { backend, .. } | StoreError::Persistence { backend, .. } => {
                backend
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            StoreError::Unavailable { .. } => "STORE_UNAVAILABLE",
            StoreError::Persistence { .. } => "PERSISTENCE_ERROR",
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable { .. })
    }
}

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config{}: {message}", file_suffix(.file))]
    ParseError {
        file: Option<String>,
        message: String,
    },

    #[error("Invalid value '{value}' for '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    #[error("Failed to read config file '{path}': {message}")]
    IoError { path: String, message: String },
}

fn file_suffix(file: &Option<String>) -> String {
    file.as_deref()
        .map(|f| format!(" file '{f}'"))
        .unwrap_or_default()
}

/// Body of every failed API response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Errors returned by HTTP handlers
///
/// The wire contract makes no distinction between kinds: every variant becomes
/// `500 { "error": <Display> }`. The kind is kept for the log line only.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The request body could not be read as an invoice
    #[error("{0}")]
    InvalidBody(String),

    /// Sequence failures are reported with a fixed message
    #[error("Error fetching invoice number")]
    NextNumber(#[source] StoreError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Store(e) | ApiError::NextNumber(e) => e.error_code(),
            ApiError::InvalidBody(_) => "INVALID_BODY",
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Store(e) | ApiError::NextNumber(e) => tracing::error!(
                code = self.error_code(),
                backend = e.backend(),
                error = %e,
                "Request failed"
            ),
            ApiError::InvalidBody(message) => {
                tracing::error!(code = self.error_code(), error = %message, "Request failed")
            }
        }

        (self.status_code(), Json(self.to_response())).into_response()
    }
}
