//! Filesystem persistence for terrastate.
//!
//! Provides the [`StateStore`] trait defining the document storage contract,
//! the [`FileStore`] backend that implements it, and the [`LockManager`]
//! that hands out one exclusive lock per environment.
//!
//! # Architecture
//!
//! Everything lives in a single state directory ([`StateDir`]). That
//! directory is the only coordination point between server instances, so
//! every guarantee here comes from filesystem primitives rather than
//! in-process locks:
//! - document writes go to a temporary file in the same directory and are
//!   moved into place with an atomic rename;
//! - lock markers are created with `O_CREAT | O_EXCL`, so exactly one
//!   caller can create a given marker.
//!
//! # Modules
//!
//! - [`error`]: StorageError enum with all failure modes
//! - [`layout`]: StateDir and the per-environment file names
//! - [`traits`]: StateStore trait definition
//! - [`file`]: FileStore implementation
//! - [`lock`]: LockManager and the lock marker contents

pub mod error;
pub mod file;
pub mod layout;
pub mod lock;
pub mod traits;

// Re-export key types for ergonomic use.
pub use error::StorageError;
pub use file::FileStore;
pub use layout::StateDir;
pub use lock::{LockInfo, LockManager, LockStatus};
pub use traits::StateStore;
