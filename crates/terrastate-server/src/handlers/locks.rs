//! Lock handlers.
//!
//! `LOCK` and `UNLOCK` arrive through [`super::state::extension_method`];
//! both answer with the environment's current document on success. A `LOCK`
//! whose document cannot be read is rolled back, so a failed response never
//! leaves the environment locked.

use axum::extract::State;
use axum::Json;

use terrastate_core::{Environment, StateDocument};
use terrastate_storage::StorageError;

use super::blocking;
use crate::error::ApiError;
use crate::extract::EnvPath;
use crate::schema::locks::LockStatusResponse;
use crate::state::AppState;

/// `LOCK /{env}`
pub async fn lock(state: AppState, env: Environment) -> Result<Json<StateDocument>, ApiError> {
    let locks = state.locks.clone();
    let target = env.clone();
    let acquired = blocking(move || match locks.acquire(&target) {
        Ok(info) => Ok(Ok(info)),
        Err(StorageError::AlreadyLocked(_)) => {
            Ok(Err(locks.status(&target).ok().and_then(|s| s.holder)))
        }
        Err(e) => Err(e),
    })
    .await?;

    match acquired {
        Ok(info) => tracing::info!(environment = %env, lock_id = %info.id, "lock acquired"),
        Err(holder) => {
            tracing::warn!(environment = %env, ?holder, "lock refused: already locked");
            return Err(ApiError::AlreadyLocked);
        }
    }

    match current_document(&state, env.clone()).await {
        Ok(doc) => Ok(doc),
        Err(err) => {
            let locks = state.locks.clone();
            let target = env.clone();
            match blocking(move || locks.release(&target)).await {
                Ok(()) => tracing::warn!(environment = %env, error = %err, "lock rolled back"),
                Err(release) => tracing::error!(
                    environment = %env,
                    error = %err,
                    release_error = %release,
                    "lock rollback failed"
                ),
            }
            Err(err)
        }
    }
}

/// `UNLOCK /{env}`
pub async fn unlock(state: AppState, env: Environment) -> Result<Json<StateDocument>, ApiError> {
    let locks = state.locks.clone();
    let target = env.clone();
    if let Err(err) = blocking(move || locks.release(&target)).await {
        if matches!(err, ApiError::NotLocked) {
            tracing::warn!(environment = %env, "unlock refused: not locked");
        }
        return Err(err);
    }
    tracing::info!(environment = %env, "lock released");

    current_document(&state, env).await
}

/// Reports whether `env` is locked and by whom.
///
/// `GET /{env}/lock`
pub async fn lock_status(
    State(state): State<AppState>,
    EnvPath(env): EnvPath,
) -> Result<Json<LockStatusResponse>, ApiError> {
    let locks = state.locks.clone();
    let target = env.clone();
    let status = blocking(move || locks.status(&target)).await?;
    Ok(Json(LockStatusResponse {
        environment: env.to_string(),
        locked: status.locked,
        holder: status.holder,
    }))
}

async fn current_document(
    state: &AppState,
    env: Environment,
) -> Result<Json<StateDocument>, ApiError> {
    let store = state.store.clone();
    let doc = blocking(move || store.get(&env)).await?;
    Ok(Json(doc))
}
