//! Dashboard aggregates.

use serde::Serialize;
use sqlx::FromRow;

/// Live totals shown at the top of the dashboard.
#[derive(Debug, Clone, Copy, FromRow, Serialize)]
pub struct StaffSummary {
    pub total_staff: i64,
    pub company_count: i64,
}
