//! Follow-up interactions logged against companies.

use backoffice_core::forms;
use backoffice_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `follow_ups` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FollowUp {
    pub id: DbId,
    pub company_id: DbId,
    pub follow_up_date: Option<NaiveDate>,
    pub next_follow_up_date: Option<NaiveDate>,
    pub follow_up_type: Option<String>,
    pub remarks: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Follow-up joined with the owning company's name and status.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FollowUpView {
    pub id: DbId,
    pub company_id: DbId,
    pub company_name: String,
    pub company_status: String,
    pub follow_up_date: Option<NaiveDate>,
    pub next_follow_up_date: Option<NaiveDate>,
    pub follow_up_type: Option<String>,
    pub remarks: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Follow-up create/update body. No validation rules beyond shape.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FollowUpInput {
    #[serde(default, deserialize_with = "forms::opt_id")]
    pub company_id: Option<DbId>,
    #[serde(default, deserialize_with = "forms::opt_date")]
    pub follow_up_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "forms::opt_date")]
    pub next_follow_up_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "forms::opt_text")]
    pub follow_up_type: Option<String>,
    #[serde(default, deserialize_with = "forms::opt_text")]
    pub remarks: Option<String>,
}
