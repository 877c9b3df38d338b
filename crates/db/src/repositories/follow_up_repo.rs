//! Repository for the `follow_ups` table.

use backoffice_core::types::DbId;
use sqlx::PgPool;

use crate::models::follow_up::{FollowUp, FollowUpInput, FollowUpView};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, company_id, follow_up_date, next_follow_up_date, follow_up_type, \
                        remarks, created_at, updated_at";

/// Follow-ups joined with their company, producing a [`FollowUpView`].
const VIEW_SELECT: &str = "SELECT f.id, f.company_id, c.company_name, c.status AS company_status, \
                                  f.follow_up_date, f.next_follow_up_date, f.follow_up_type, \
                                  f.remarks, f.created_at, f.updated_at \
                           FROM follow_ups f \
                           JOIN companies c ON c.id = f.company_id";

/// Oldest first; id breaks ties between rows created in the same instant.
const VIEW_ORDER: &str = "ORDER BY f.created_at ASC, f.id ASC";

/// Provides CRUD operations for follow-ups.
pub struct FollowUpRepo;

impl FollowUpRepo {
    /// Insert a new follow-up, returning the created row.
    pub async fn create(pool: &PgPool, input: &FollowUpInput) -> Result<FollowUp, sqlx::Error> {
        let query = format!(
            "INSERT INTO follow_ups
                (company_id, follow_up_date, next_follow_up_date, follow_up_type, remarks)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FollowUp>(&query)
            .bind(input.company_id)
            .bind(input.follow_up_date)
            .bind(input.next_follow_up_date)
            .bind(&input.follow_up_type)
            .bind(&input.remarks)
            .fetch_one(pool)
            .await
    }

    /// Find one follow-up in presentation form.
    pub async fn find_view(pool: &PgPool, id: DbId) -> Result<Option<FollowUpView>, sqlx::Error> {
        let query = format!("{VIEW_SELECT} WHERE f.id = $1");
        sqlx::query_as::<_, FollowUpView>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Count follow-ups, optionally restricted to one company.
    pub async fn count(pool: &PgPool, company_id: Option<DbId>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM follow_ups WHERE ($1::BIGINT IS NULL OR company_id = $1)",
        )
        .bind(company_id)
        .fetch_one(pool)
        .await
    }

    /// One page of follow-ups, optionally restricted to one company.
    pub async fn list(
        pool: &PgPool,
        company_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FollowUpView>, sqlx::Error> {
        let query = format!(
            "{VIEW_SELECT} WHERE ($1::BIGINT IS NULL OR f.company_id = $1) {VIEW_ORDER} \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, FollowUpView>(&query)
            .bind(company_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count follow-ups whose company name matches the ILIKE pattern.
    pub async fn count_by_company_name(
        pool: &PgPool,
        search_pattern: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM follow_ups f
             JOIN companies c ON c.id = f.company_id
             WHERE ($1::TEXT IS NULL OR c.company_name ILIKE $1)",
        )
        .bind(search_pattern)
        .fetch_one(pool)
        .await
    }

    /// One page of follow-ups whose company name matches the ILIKE pattern.
    pub async fn list_by_company_name(
        pool: &PgPool,
        search_pattern: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FollowUpView>, sqlx::Error> {
        let query = format!(
            "{VIEW_SELECT} WHERE ($1::TEXT IS NULL OR c.company_name ILIKE $1) {VIEW_ORDER} \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, FollowUpView>(&query)
            .bind(search_pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Every follow-up, oldest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<FollowUpView>, sqlx::Error> {
        let query = format!("{VIEW_SELECT} {VIEW_ORDER}");
        sqlx::query_as::<_, FollowUpView>(&query).fetch_all(pool).await
    }

    /// The follow-up with the soonest `next_follow_up_date` on or after today.
    pub async fn next_upcoming(pool: &PgPool) -> Result<Option<FollowUpView>, sqlx::Error> {
        let query = format!(
            "{VIEW_SELECT} WHERE f.next_follow_up_date >= CURRENT_DATE \
             ORDER BY f.next_follow_up_date ASC, f.id ASC LIMIT 1"
        );
        sqlx::query_as::<_, FollowUpView>(&query)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite every field. Returns `None` if no row with `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &FollowUpInput,
    ) -> Result<Option<FollowUp>, sqlx::Error> {
        let query = format!(
            "UPDATE follow_ups SET
                company_id = $2,
                follow_up_date = $3,
                next_follow_up_date = $4,
                follow_up_type = $5,
                remarks = $6
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FollowUp>(&query)
            .bind(id)
            .bind(input.company_id)
            .bind(input.follow_up_date)
            .bind(input.next_follow_up_date)
            .bind(&input.follow_up_type)
            .bind(&input.remarks)
            .fetch_optional(pool)
            .await
    }

    /// Delete a follow-up. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM follow_ups WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
