//! Request extractors.

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use terrastate_core::Environment;

use crate::error::ApiError;

/// The validated `{env}` path segment.
///
/// Rejects with [`ApiError::InvalidEnvironment`] (400) before any handler
/// runs, so no unvalidated name reaches the store.
#[derive(Debug, Clone)]
pub struct EnvPath(pub Environment);

impl<S> FromRequestParts<S> for EnvPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(name) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::InvalidEnvironment(rejection.body_text()))?;
        Ok(EnvPath(Environment::parse(&name)?))
    }
}
