//! HTTP handler modules for the state backend API.
//!
//! Handlers are thin: they validate the environment, hand the work to the
//! store or lock manager on a blocking thread, and return JSON. No
//! filesystem access happens here directly.

pub mod locks;
pub mod state;
pub mod system;

use terrastate_storage::StorageError;

use crate::error::ApiError;

/// Runs a storage call on tokio's blocking pool.
pub(crate) async fn blocking<T, F>(op: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, StorageError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|e| ApiError::InternalError(format!("storage task failed: {e}")))?
        .map_err(ApiError::from)
}
