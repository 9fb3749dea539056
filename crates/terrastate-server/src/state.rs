//! Application state shared by all handlers.
//!
//! [`AppState`] holds the document store and the lock manager behind `Arc`s.
//! Neither carries per-request data: every call names its environment, so
//! the state is cloned freely into handler tasks without any mutex.

use std::sync::Arc;

use terrastate_storage::{FileStore, LockManager, StateDir, StateStore, StorageError};

use crate::config::{Config, DEFAULT_MAX_BODY_BYTES};

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// Per-environment document storage.
    pub store: Arc<dyn StateStore>,
    /// Per-environment exclusive locks.
    pub locks: Arc<LockManager>,
    /// Largest accepted request body.
    pub max_body_bytes: usize,
}

impl AppState {
    /// Opens (creating if needed) the configured state directory.
    pub fn new(config: &Config) -> Result<Self, StorageError> {
        let dir = StateDir::open(&config.state_path)?;
        Ok(AppState::with_dir(dir, config.max_body_bytes))
    }

    /// Builds state over an already opened directory.
    pub fn with_dir(dir: StateDir, max_body_bytes: usize) -> Self {
        AppState {
            store: Arc::new(FileStore::new(dir.clone())),
            locks: Arc::new(LockManager::new(dir)),
            max_body_bytes,
        }
    }

    /// Opens `dir` with the default body limit.
    pub fn open(dir: impl Into<std::path::PathBuf>) -> Result<Self, StorageError> {
        Ok(AppState::with_dir(StateDir::open(dir)?, DEFAULT_MAX_BODY_BYTES))
    }
}
