//! Schema types for lock inspection.

use serde::Serialize;

use terrastate_storage::LockInfo;

/// Response to `GET /{env}/lock`.
#[derive(Debug, Clone, Serialize)]
pub struct LockStatusResponse {
    pub environment: String,
    pub locked: bool,
    /// Holder recorded in the marker, if it could be read.
    pub holder: Option<LockInfo>,
}
