//! Domain error type shared by every crate in the workspace.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A record looked up by primary key does not exist.
    #[error("{entity} not found (id {id})")]
    NotFound { entity: &'static str, id: DbId },

    /// A stored file looked up by name does not exist in any search location.
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    /// Input failed a business rule that is not expressed as a field rule.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The operation targets a value that may never be modified or removed.
    #[error("Protected value: {0}")]
    Protected(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
