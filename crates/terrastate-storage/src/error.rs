//! Storage error types for terrastate-storage.
//!
//! [`StorageError`] covers every failure the store and lock manager can
//! report. Nothing in this crate retries; callers decide what to do.

use std::path::PathBuf;

use terrastate_core::Environment;
use thiserror::Error;

/// Errors produced by storage and lock operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A filesystem call failed.
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A document could not be serialized for writing.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored document no longer parses as a state document.
    #[error("corrupt state file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The configured state path exists but is not a directory.
    #[error("state path {0} is not a directory")]
    NotADirectory(PathBuf),

    /// Acquire on an environment whose lock marker already exists.
    #[error("environment '{0}' is already locked")]
    AlreadyLocked(Environment),

    /// Release on an environment that has no lock marker.
    #[error("environment '{0}' is not locked")]
    NotLocked(Environment),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}
