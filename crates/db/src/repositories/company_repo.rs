//! Repository for the `companies` table.

use backoffice_core::company::STATUS_WAITING;
use backoffice_core::types::DbId;
use sqlx::PgPool;

use crate::models::company::{Company, CompanyInput};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, company_name, type_of_company, other_type_of_company, \
                        street_address, area, city, state, pincode, country, \
                        contact_person, contact_person_designation, contact_email, contact_mobile, \
                        alternate_contact_person, alternate_contact_person_designation, \
                        alternate_contact_email, alternate_contact_mobile, \
                        status, created_at, updated_at";

/// Provides CRUD and taxonomy operations for companies.
pub struct CompanyRepo;

impl CompanyRepo {
    /// Insert a new company. Status always starts as `waiting`.
    pub async fn create(pool: &PgPool, input: &CompanyInput) -> Result<Company, sqlx::Error> {
        let (type_of_company, other_type) = input.type_columns();
        let query = format!(
            "INSERT INTO companies
                (company_name, type_of_company, other_type_of_company,
                 street_address, area, city, state, pincode, country,
                 contact_person, contact_person_designation, contact_email, contact_mobile,
                 alternate_contact_person, alternate_contact_person_designation,
                 alternate_contact_email, alternate_contact_mobile, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(&input.company_name)
            .bind(type_of_company)
            .bind(other_type)
            .bind(&input.street_address)
            .bind(&input.area)
            .bind(&input.city)
            .bind(&input.state)
            .bind(&input.pincode)
            .bind(&input.country)
            .bind(&input.contact_person)
            .bind(&input.contact_person_designation)
            .bind(&input.contact_email)
            .bind(&input.contact_mobile)
            .bind(&input.alternate_contact_person)
            .bind(&input.alternate_contact_person_designation)
            .bind(&input.alternate_contact_email)
            .bind(&input.alternate_contact_mobile)
            .bind(STATUS_WAITING)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Company>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM companies WHERE id = $1");
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM companies WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Count companies whose name matches the ILIKE pattern (all when `None`).
    pub async fn count(pool: &PgPool, search_pattern: Option<&str>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM companies WHERE ($1::TEXT IS NULL OR company_name ILIKE $1)",
        )
        .bind(search_pattern)
        .fetch_one(pool)
        .await
    }

    /// One page of companies matching the name pattern, in id order.
    pub async fn list(
        pool: &PgPool,
        search_pattern: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Company>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM companies
             WHERE ($1::TEXT IS NULL OR company_name ILIKE $1)
             ORDER BY id ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(search_pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Every company, in id order.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Company>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM companies ORDER BY id ASC");
        sqlx::query_as::<_, Company>(&query).fetch_all(pool).await
    }

    /// Overwrite every mutable field. Status is left untouched.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &CompanyInput,
    ) -> Result<Option<Company>, sqlx::Error> {
        let (type_of_company, other_type) = input.type_columns();
        let query = format!(
            "UPDATE companies SET
                company_name = $2,
                type_of_company = $3,
                other_type_of_company = $4,
                street_address = $5,
                area = $6,
                city = $7,
                state = $8,
                pincode = $9,
                country = $10,
                contact_person = $11,
                contact_person_designation = $12,
                contact_email = $13,
                contact_mobile = $14,
                alternate_contact_person = $15,
                alternate_contact_person_designation = $16,
                alternate_contact_email = $17,
                alternate_contact_mobile = $18
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .bind(&input.company_name)
            .bind(type_of_company)
            .bind(other_type)
            .bind(&input.street_address)
            .bind(&input.area)
            .bind(&input.city)
            .bind(&input.state)
            .bind(&input.pincode)
            .bind(&input.country)
            .bind(&input.contact_person)
            .bind(&input.contact_person_designation)
            .bind(&input.contact_email)
            .bind(&input.contact_mobile)
            .bind(&input.alternate_contact_person)
            .bind(&input.alternate_contact_person_designation)
            .bind(&input.alternate_contact_email)
            .bind(&input.alternate_contact_mobile)
            .fetch_optional(pool)
            .await
    }

    /// Set the status of one company. Returns `true` if the row exists.
    pub async fn set_status(pool: &PgPool, id: DbId, status: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE companies SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a company; its follow-ups cascade. Returns `true` if removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Type taxonomy
    // -----------------------------------------------------------------------

    /// Distinct non-null company types, alphabetically.
    pub async fn list_types(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT type_of_company FROM companies
             WHERE type_of_company IS NOT NULL
             ORDER BY type_of_company ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// Null `type_of_company` on every company using `type_name`.
    ///
    /// Returns the number of affected companies.
    pub async fn clear_type(pool: &PgPool, type_name: &str) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("UPDATE companies SET type_of_company = NULL WHERE type_of_company = $1")
                .bind(type_name)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }
}
