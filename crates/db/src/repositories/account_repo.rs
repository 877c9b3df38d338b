//! Repository for the `accounts` table.

use backoffice_core::types::DbId;
use sqlx::PgPool;

use crate::models::account::{Account, AccountProfile, NewAccount};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, password_hash, role_id, is_active, \
                        last_login_at, created_at, updated_at";

/// Select list and joins producing an [`AccountProfile`].
const PROFILE_SELECT: &str = "SELECT a.id, a.name, a.email, r.name AS role, s.id AS staff_id, \
                                     a.is_active AS active, a.last_login_at, a.created_at, a.updated_at \
                              FROM accounts a \
                              JOIN roles r ON r.id = a.role_id \
                              LEFT JOIN staff s ON s.account_id = a.id";

/// Provides CRUD operations for accounts.
///
/// Staff-owned accounts are written through [`super::StaffRepo`] so the
/// account and its staff record change in one transaction.
pub struct AccountRepo;

impl AccountRepo {
    /// Insert a standalone account, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewAccount) -> Result<Account, sqlx::Error> {
        let query = format!(
            "INSERT INTO accounts (name, email, password_hash, role_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Account>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(input.role_id)
            .fetch_one(pool)
            .await
    }

    /// Find an account by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Account>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM accounts WHERE email = $1");
        sqlx::query_as::<_, Account>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Load the identity view of an account: role name and linked staff id.
    pub async fn find_profile(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AccountProfile>, sqlx::Error> {
        let query = format!("{PROFILE_SELECT} WHERE a.id = $1");
        sqlx::query_as::<_, AccountProfile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether another account already uses `email`.
    pub async fn email_taken(
        pool: &PgPool,
        email: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                SELECT 1 FROM accounts
                WHERE email = $1 AND ($2::BIGINT IS NULL OR id <> $2)
             )",
        )
        .bind(email)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
    }

    /// Stamp `last_login_at` with the current time.
    pub async fn record_successful_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE accounts SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
