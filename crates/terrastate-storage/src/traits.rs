//! The [`StateStore`] trait defining the storage contract for state documents.
//!
//! Every method takes the environment explicitly. A store holds no
//! per-request state, so one instance is shared by all handlers.

use terrastate_core::{Environment, StateDocument};

use crate::error::StorageError;

/// The storage contract for per-environment state documents.
///
/// The trait is synchronous; async callers move calls onto a blocking
/// thread.
pub trait StateStore: Send + Sync {
    /// Returns the stored document, or [`StateDocument::default`] if
    /// nothing has been written for `env`.
    fn get(&self, env: &Environment) -> Result<StateDocument, StorageError>;

    /// Replaces whatever is stored for `env` with `doc` and returns it.
    ///
    /// Readers see either the old or the new document, never a mix. No
    /// comparison against the stored `serial` is made.
    fn put(&self, env: &Environment, doc: StateDocument) -> Result<StateDocument, StorageError>;

    /// Removes the stored document. Succeeds when nothing is stored.
    ///
    /// Returns whether a document existed.
    fn delete(&self, env: &Environment) -> Result<bool, StorageError>;
}
