//! Aggregate queries behind the dashboard.

use sqlx::PgPool;

use crate::models::dashboard::StaffSummary;

pub struct DashboardRepo;

impl DashboardRepo {
    /// Live staff and company totals.
    pub async fn staff_summary(pool: &PgPool) -> Result<StaffSummary, sqlx::Error> {
        sqlx::query_as::<_, StaffSummary>(
            "SELECT
                (SELECT COUNT(*) FROM staff) AS total_staff,
                (SELECT COUNT(*) FROM companies) AS company_count",
        )
        .fetch_one(pool)
        .await
    }
}
