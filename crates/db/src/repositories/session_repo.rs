//! Repository for the `account_sessions` table.

use sqlx::PgPool;

use crate::models::session::{AccountSession, CreateSession};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, account_id, token_hash, expires_at, is_revoked, \
                        user_agent, created_at, updated_at";

/// Tracks issued bearer tokens so they can be revoked individually.
pub struct SessionRepo;

impl SessionRepo {
    /// Record a newly issued token, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSession,
    ) -> Result<AccountSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO account_sessions (account_id, token_hash, expires_at, user_agent)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AccountSession>(&query)
            .bind(input.account_id)
            .bind(&input.token_hash)
            .bind(input.expires_at)
            .bind(&input.user_agent)
            .fetch_one(pool)
            .await
    }

    /// Find a session by token hash.
    ///
    /// Only returns sessions that are not revoked and not expired.
    pub async fn find_active_by_token_hash(
        pool: &PgPool,
        hash: &str,
    ) -> Result<Option<AccountSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM account_sessions
             WHERE token_hash = $1
               AND is_revoked = false
               AND expires_at > NOW()"
        );
        sqlx::query_as::<_, AccountSession>(&query)
            .bind(hash)
            .fetch_optional(pool)
            .await
    }

    /// Revoke the session for one token. Returns `true` if a row changed.
    pub async fn revoke_by_token_hash(pool: &PgPool, hash: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE account_sessions SET is_revoked = true
             WHERE token_hash = $1 AND is_revoked = false",
        )
        .bind(hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete expired or revoked sessions. Returns the count of deleted rows.
    pub async fn cleanup_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM account_sessions WHERE expires_at < NOW() OR is_revoked = true",
        )
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
