//! Data model for the terrastate remote state backend.
//!
//! - [`document`]: the opaque [`StateDocument`] value and its [`Module`] entries
//! - [`environment`]: the validated [`Environment`] name newtype
//! - [`error`]: [`CoreError`]
//!
//! Nothing in this crate performs I/O; persistence lives in
//! `terrastate-storage`.

pub mod document;
pub mod environment;
pub mod error;

// Re-export commonly used types
pub use document::{Module, StateDocument, STATE_FORMAT_VERSION};
pub use environment::Environment;
pub use error::CoreError;
