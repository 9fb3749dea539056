//! Health check and fallbacks.

use axum::http::{Method, Uri};
use axum::Json;

use crate::error::ApiError;
use crate::schema::system::HealthResponse;

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Router-wide fallback for paths no route matches.
pub async fn unmapped_route(uri: Uri) -> ApiError {
    ApiError::UnmappedRoute(uri.path().to_string())
}

/// Method fallback for fixed routes.
pub async fn method_not_allowed(method: Method) -> ApiError {
    ApiError::MethodNotAllowed(method.to_string())
}
