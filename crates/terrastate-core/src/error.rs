//! Core error types for terrastate-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering the
//! failure modes of the pure data model: bad environment names and state
//! documents that do not carry the required envelope.

use thiserror::Error;

/// Core errors produced by the terrastate-core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An environment name that could escape the storage directory or is
    /// otherwise unusable as a file-name component.
    #[error("invalid environment name '{name}': {reason}")]
    InvalidEnvironmentName { name: String, reason: &'static str },

    /// A request body that is not a JSON state document.
    #[error("malformed state document: {0}")]
    MalformedDocument(#[from] serde_json::Error),
}
