//! Repository for staff records and everything they own.
//!
//! A staff record owns its account, images, education and paper rows.
//! Every write that touches more than one of those runs in one transaction.

use std::collections::HashMap;

use backoffice_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::staff::{
    ImageRemoval, NewEducation, NewPaper, NewStaff, Staff, StaffDetail, StaffEducation,
    StaffImage, StaffListItem, StaffPaper, StaffUpdate, StaffWithImages,
};

/// Column list for `staff`.
const COLUMNS: &str = "id, account_id, staff_name, employee_code, date_of_birth, address, \
                        mobile, email, course_ids, semester_ids, subject_ids, created_at, updated_at";

const IMAGE_COLUMNS: &str = "id, staff_id, filename, created_at, updated_at";

const EDUCATION_COLUMNS: &str = "id, staff_id, qualification, college_name, board_university, \
                                  passing_year, percentage, created_at, updated_at";

const PAPER_COLUMNS: &str = "id, staff_id, title, journal, published_year, created_at, updated_at";

/// Staff joined with account name/role, producing a [`StaffListItem`].
const LIST_SELECT: &str = "SELECT s.id, s.account_id, a.name, r.name AS role, a.is_active AS active, \
                                  s.staff_name, s.employee_code, s.date_of_birth, s.address, s.mobile, \
                                  s.email, s.course_ids, s.semester_ids, s.subject_ids, \
                                  s.created_at, s.updated_at \
                           FROM staff s \
                           LEFT JOIN accounts a ON a.id = s.account_id \
                           LEFT JOIN roles r ON r.id = a.role_id";

/// `$1` is an ILIKE pattern on `staff_name`, `$2` an exact role name.
const LIST_FILTER: &str = "WHERE ($1::TEXT IS NULL OR s.staff_name ILIKE $1) \
                             AND ($2::TEXT IS NULL OR r.name = $2)";

/// Provides CRUD operations for staff records.
pub struct StaffRepo;

impl StaffRepo {
    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Create the account, the staff record and its children in one
    /// transaction. The staff email is copied from the account.
    pub async fn create(pool: &PgPool, input: &NewStaff) -> Result<Staff, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let account_id: DbId = sqlx::query_scalar(
            "INSERT INTO accounts (name, email, password_hash, role_id)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(&input.account.name)
        .bind(&input.account.email)
        .bind(&input.account.password_hash)
        .bind(input.account.role_id)
        .fetch_one(&mut *tx)
        .await?;

        let query = format!(
            "INSERT INTO staff
                (account_id, staff_name, employee_code, date_of_birth, address, mobile,
                 email, course_ids, semester_ids, subject_ids)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        let f = &input.fields;
        let staff = sqlx::query_as::<_, Staff>(&query)
            .bind(account_id)
            .bind(&f.staff_name)
            .bind(&f.employee_code)
            .bind(f.date_of_birth)
            .bind(&f.address)
            .bind(&f.mobile)
            .bind(&input.account.email)
            .bind(&f.course_ids)
            .bind(&f.semester_ids)
            .bind(&f.subject_ids)
            .fetch_one(&mut *tx)
            .await?;

        Self::insert_education(&mut tx, staff.id, &input.education).await?;
        Self::insert_papers(&mut tx, staff.id, &input.papers).await?;
        Self::insert_images(&mut tx, staff.id, &input.image_filenames).await?;

        tx.commit().await?;
        Ok(staff)
    }

    /// Overwrite the staff record and its account, then apply sub-record
    /// replacements and image deltas.
    ///
    /// Returns the filenames of removed images so the caller can delete the
    /// blobs once the transaction has committed.
    pub async fn update(
        pool: &PgPool,
        staff: &Staff,
        input: &StaffUpdate,
    ) -> Result<Vec<String>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "UPDATE accounts SET
                name = $2,
                email = $3,
                is_active = $4,
                role_id = $5,
                password_hash = COALESCE($6, password_hash)
             WHERE id = $1",
        )
        .bind(staff.account_id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(input.is_active)
        .bind(input.role_id)
        .bind(&input.password_hash)
        .execute(&mut *tx)
        .await?;

        let f = &input.fields;
        sqlx::query(
            "UPDATE staff SET
                staff_name = $2,
                employee_code = $3,
                date_of_birth = $4,
                address = $5,
                mobile = $6,
                email = $7,
                course_ids = $8,
                semester_ids = $9,
                subject_ids = $10
             WHERE id = $1",
        )
        .bind(staff.id)
        .bind(&f.staff_name)
        .bind(&f.employee_code)
        .bind(f.date_of_birth)
        .bind(&f.address)
        .bind(&f.mobile)
        .bind(&input.email)
        .bind(&f.course_ids)
        .bind(&f.semester_ids)
        .bind(&f.subject_ids)
        .execute(&mut *tx)
        .await?;

        if let Some(education) = &input.education {
            sqlx::query("DELETE FROM staff_education WHERE staff_id = $1")
                .bind(staff.id)
                .execute(&mut *tx)
                .await?;
            Self::insert_education(&mut tx, staff.id, education).await?;
        }

        if let Some(papers) = &input.papers {
            sqlx::query("DELETE FROM staff_papers WHERE staff_id = $1")
                .bind(staff.id)
                .execute(&mut *tx)
                .await?;
            Self::insert_papers(&mut tx, staff.id, papers).await?;
        }

        let removed: Vec<String> = match &input.image_removal {
            ImageRemoval::Keep => Vec::new(),
            ImageRemoval::All => {
                sqlx::query_scalar("DELETE FROM staff_images WHERE staff_id = $1 RETURNING filename")
                    .bind(staff.id)
                    .fetch_all(&mut *tx)
                    .await?
            }
            ImageRemoval::Ids(ids) => {
                sqlx::query_scalar(
                    "DELETE FROM staff_images WHERE staff_id = $1 AND id = ANY($2)
                     RETURNING filename",
                )
                .bind(staff.id)
                .bind(ids)
                .fetch_all(&mut *tx)
                .await?
            }
        };

        Self::insert_images(&mut tx, staff.id, &input.image_filenames).await?;

        tx.commit().await?;
        Ok(removed)
    }

    /// Delete images, the staff record and its account, in that order.
    ///
    /// Returns the removed image filenames, or `None` if no such record.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Vec<String>>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let account_id: Option<DbId> =
            sqlx::query_scalar("SELECT account_id FROM staff WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(account_id) = account_id else {
            return Ok(None);
        };

        let filenames: Vec<String> =
            sqlx::query_scalar("DELETE FROM staff_images WHERE staff_id = $1 RETURNING filename")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;

        sqlx::query("DELETE FROM staff WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(account_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(filenames))
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Staff>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM staff WHERE id = $1");
        sqlx::query_as::<_, Staff>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find one record in presentation form, images included.
    pub async fn find_with_images(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<StaffWithImages>, sqlx::Error> {
        let query = format!("{LIST_SELECT} WHERE s.id = $1");
        let item = sqlx::query_as::<_, StaffListItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        match item {
            Some(item) => Ok(Self::attach_images(pool, vec![item]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Find one record with images, education and papers.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<StaffDetail>, sqlx::Error> {
        let Some(found) = Self::find_with_images(pool, id).await? else {
            return Ok(None);
        };

        let education_query = format!(
            "SELECT {EDUCATION_COLUMNS} FROM staff_education WHERE staff_id = $1 ORDER BY id ASC"
        );
        let education = sqlx::query_as::<_, StaffEducation>(&education_query)
            .bind(id)
            .fetch_all(pool)
            .await?;

        let papers_query =
            format!("SELECT {PAPER_COLUMNS} FROM staff_papers WHERE staff_id = $1 ORDER BY id ASC");
        let papers = sqlx::query_as::<_, StaffPaper>(&papers_query)
            .bind(id)
            .fetch_all(pool)
            .await?;

        Ok(Some(StaffDetail {
            staff: found.staff,
            images: found.images,
            education,
            papers,
        }))
    }

    /// Count records matching the list filter.
    pub async fn count(
        pool: &PgPool,
        search_pattern: Option<&str>,
        role: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) FROM staff s \
             LEFT JOIN accounts a ON a.id = s.account_id \
             LEFT JOIN roles r ON r.id = a.role_id \
             {LIST_FILTER}"
        );
        sqlx::query_scalar::<_, i64>(&query)
            .bind(search_pattern)
            .bind(role)
            .fetch_one(pool)
            .await
    }

    /// One page of records matching the list filter, in id order.
    pub async fn list(
        pool: &PgPool,
        search_pattern: Option<&str>,
        role: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<StaffWithImages>, sqlx::Error> {
        let query = format!("{LIST_SELECT} {LIST_FILTER} ORDER BY s.id ASC LIMIT $3 OFFSET $4");
        let items = sqlx::query_as::<_, StaffListItem>(&query)
            .bind(search_pattern)
            .bind(role)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;
        Self::attach_images(pool, items).await
    }

    /// Every record, unfiltered, in id order.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<StaffWithImages>, sqlx::Error> {
        let query = format!("{LIST_SELECT} ORDER BY s.id ASC");
        let items = sqlx::query_as::<_, StaffListItem>(&query)
            .fetch_all(pool)
            .await?;
        Self::attach_images(pool, items).await
    }

    /// Whether another record already uses `staff_name`.
    pub async fn staff_name_taken(
        pool: &PgPool,
        staff_name: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                SELECT 1 FROM staff
                WHERE staff_name = $1 AND ($2::BIGINT IS NULL OR id <> $2)
             )",
        )
        .bind(staff_name)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
    }

    /// Whether another record already uses `employee_code`.
    pub async fn employee_code_taken(
        pool: &PgPool,
        employee_code: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                SELECT 1 FROM staff
                WHERE employee_code = $1 AND ($2::BIGINT IS NULL OR id <> $2)
             )",
        )
        .bind(employee_code)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Fetch images for a batch of records with one query.
    async fn attach_images(
        pool: &PgPool,
        items: Vec<StaffListItem>,
    ) -> Result<Vec<StaffWithImages>, sqlx::Error> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<DbId> = items.iter().map(|i| i.id).collect();
        let query = format!(
            "SELECT {IMAGE_COLUMNS} FROM staff_images WHERE staff_id = ANY($1) ORDER BY id ASC"
        );
        let images = sqlx::query_as::<_, StaffImage>(&query)
            .bind(&ids)
            .fetch_all(pool)
            .await?;

        let mut by_staff: HashMap<DbId, Vec<StaffImage>> = HashMap::new();
        for image in images {
            by_staff.entry(image.staff_id).or_default().push(image);
        }

        Ok(items
            .into_iter()
            .map(|staff| StaffWithImages {
                images: by_staff.remove(&staff.id).unwrap_or_default(),
                staff,
            })
            .collect())
    }

    async fn insert_education(
        tx: &mut Transaction<'_, Postgres>,
        staff_id: DbId,
        entries: &[NewEducation],
    ) -> Result<(), sqlx::Error> {
        for e in entries {
            sqlx::query(
                "INSERT INTO staff_education
                    (staff_id, qualification, college_name, board_university, passing_year, percentage)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(staff_id)
            .bind(&e.qualification)
            .bind(&e.college_name)
            .bind(&e.board_university)
            .bind(&e.passing_year)
            .bind(&e.percentage)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    async fn insert_papers(
        tx: &mut Transaction<'_, Postgres>,
        staff_id: DbId,
        papers: &[NewPaper],
    ) -> Result<(), sqlx::Error> {
        for p in papers {
            sqlx::query(
                "INSERT INTO staff_papers (staff_id, title, journal, published_year)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(staff_id)
            .bind(&p.title)
            .bind(&p.journal)
            .bind(&p.published_year)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    async fn insert_images(
        tx: &mut Transaction<'_, Postgres>,
        staff_id: DbId,
        filenames: &[String],
    ) -> Result<(), sqlx::Error> {
        for filename in filenames {
            sqlx::query("INSERT INTO staff_images (staff_id, filename) VALUES ($1, $2)")
                .bind(staff_id)
                .bind(filename)
                .execute(&mut **tx)
                .await?;
        }
        Ok(())
    }
}
