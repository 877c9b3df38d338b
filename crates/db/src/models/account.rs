//! Login accounts.

use backoffice_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `accounts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Account {
    pub id: DbId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role_id: DbId,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Account joined with its role name and linked staff record.
///
/// This is the identity every authenticated request resolves to, and the
/// `User` object returned by login.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AccountProfile {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role: String,
    pub staff_id: Option<DbId>,
    pub active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: DbId,
}
