//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the unified error type for all endpoints. It implements
//! `axum::response::IntoResponse` and always renders as
//! `{"code": <status>, "message": <text>}` with the status equal to `code`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use terrastate_core::CoreError;
use terrastate_storage::StorageError;

use crate::config::ConfigError;

/// Error body returned by every failing request.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorDetail {
    /// HTTP status code, repeated in the body.
    pub code: u16,
    /// Human-readable error message.
    pub message: String,
}

/// API errors with HTTP status code mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// LOCK on an environment that is already locked (409).
    #[error("already locked")]
    AlreadyLocked,

    /// UNLOCK on an environment that is not locked (409).
    #[error("not locked")]
    NotLocked,

    /// Request body missing or not a state document (400).
    #[error("malformed body: {0}")]
    MalformedBody(String),

    /// Environment segment missing or unsafe (400).
    #[error("{0}")]
    InvalidEnvironment(String),

    /// Request body over the configured limit (413).
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),

    /// No route for the request path (404).
    #[error("no route for {0}")]
    UnmappedRoute(String),

    /// Method not served on this path (405).
    #[error("method {0} not allowed")]
    MethodNotAllowed(String),

    /// Filesystem failure in the store or lock manager (500).
    #[error("filesystem error: {0}")]
    Filesystem(String),

    /// Internal server error (500).
    #[error("internal error: {0}")]
    InternalError(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::AlreadyLocked | ApiError::NotLocked => StatusCode::CONFLICT,
            ApiError::MalformedBody(_) | ApiError::InvalidEnvironment(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::UnmappedRoute(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Filesystem(_) | ApiError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = ApiErrorDetail {
            code: status.as_u16(),
            message: self.to_string(),
        };
        (status, axum::Json(detail)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match &err {
            CoreError::InvalidEnvironmentName { .. } => ApiError::InvalidEnvironment(err.to_string()),
            CoreError::MalformedDocument(inner) => ApiError::MalformedBody(inner.to_string()),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match &err {
            StorageError::AlreadyLocked(_) => ApiError::AlreadyLocked,
            StorageError::NotLocked(_) => ApiError::NotLocked,
            StorageError::Io { .. }
            | StorageError::Corrupt { .. }
            | StorageError::NotADirectory(_) => {
                tracing::error!(error = %err, "storage failure");
                ApiError::Filesystem(err.to_string())
            }
            StorageError::Serialization(_) => {
                tracing::error!(error = %err, "state serialization failure");
                ApiError::InternalError(err.to_string())
            }
        }
    }
}

/// Failures that stop the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot open state directory: {0}")]
    Storage(#[from] StorageError),

    #[error("cannot listen on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}
