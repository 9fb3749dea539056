//! Schema types for document endpoints.

use serde::Serialize;

/// Response to `DELETE /{env}`.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub environment: String,
    /// Always `true`: the environment holds no document afterwards.
    pub deleted: bool,
    /// Whether a stored document was removed by this request.
    pub existed: bool,
}
