//! Account session model and DTOs.

use backoffice_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `account_sessions` table.
///
/// One row per issued bearer token; `token_hash` is the SHA-256 of its `jti`.
#[derive(Debug, Clone, FromRow)]
pub struct AccountSession {
    pub id: DbId,
    pub account_id: DbId,
    pub token_hash: String,
    pub expires_at: Timestamp,
    pub is_revoked: bool,
    pub user_agent: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording a newly issued token.
pub struct CreateSession {
    pub account_id: DbId,
    pub token_hash: String,
    pub expires_at: Timestamp,
    pub user_agent: Option<String>,
}
