//! Document handlers (get, post, delete) and extension-method dispatch.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::Json;

use terrastate_core::StateDocument;

use super::{blocking, locks};
use crate::error::ApiError;
use crate::extract::EnvPath;
use crate::schema::state::DeleteResponse;
use crate::state::AppState;

/// Returns the stored document, or the empty document if none was written.
///
/// `GET /{env}`
pub async fn get_state(
    State(state): State<AppState>,
    EnvPath(env): EnvPath,
) -> Result<Json<StateDocument>, ApiError> {
    let store = state.store.clone();
    let doc = blocking(move || store.get(&env)).await?;
    Ok(Json(doc))
}

/// Replaces the stored document with the request body.
///
/// `POST /{env}`
pub async fn post_state(
    State(state): State<AppState>,
    EnvPath(env): EnvPath,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<StateDocument>, ApiError> {
    let body = body.map_err(|rejection| match rejection.status() {
        StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge(rejection.body_text()),
        _ => ApiError::MalformedBody(rejection.body_text()),
    })?;
    let doc = StateDocument::from_slice(&body)?;
    let serial = doc.serial;

    let store = state.store.clone();
    let target = env.clone();
    let stored = blocking(move || store.put(&target, doc)).await?;

    tracing::info!(environment = %env, serial, "state stored");
    Ok(Json(stored))
}

/// Removes the stored document. Succeeds whether or not one existed.
///
/// `DELETE /{env}`
pub async fn delete_state(
    State(state): State<AppState>,
    EnvPath(env): EnvPath,
) -> Result<Json<DeleteResponse>, ApiError> {
    let store = state.store.clone();
    let target = env.clone();
    let existed = blocking(move || store.delete(&target)).await?;

    tracing::info!(environment = %env, existed, "state deleted");
    Ok(Json(DeleteResponse {
        environment: env.to_string(),
        deleted: true,
        existed,
    }))
}

/// Dispatches the `LOCK` and `UNLOCK` extension methods on `/{env}`.
///
/// Any other method not routed explicitly is answered with 405.
pub async fn extension_method(
    State(state): State<AppState>,
    method: Method,
    EnvPath(env): EnvPath,
) -> Result<Json<StateDocument>, ApiError> {
    match method.as_str() {
        "LOCK" => locks::lock(state, env).await,
        "UNLOCK" => locks::unlock(state, env).await,
        other => Err(ApiError::MethodNotAllowed(other.to_string())),
    }
}

/// Any request to `/` names no environment.
pub async fn missing_environment() -> ApiError {
    ApiError::InvalidEnvironment("missing environment name".to_string())
}
