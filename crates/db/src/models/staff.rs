//! Staff records, their images and their education/paper sub-records.

use backoffice_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;

use super::account::NewAccount;

// ---------------------------------------------------------------------------
// Staff
// ---------------------------------------------------------------------------

/// A row from the `staff` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Staff {
    pub id: DbId,
    pub account_id: DbId,
    pub staff_name: Option<String>,
    pub employee_code: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub course_ids: Option<Value>,
    pub semester_ids: Option<Value>,
    pub subject_ids: Option<Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Staff row joined with its account's display name and role.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StaffListItem {
    pub id: DbId,
    #[serde(rename = "user_id")]
    pub account_id: DbId,
    pub name: Option<String>,
    pub role: Option<String>,
    pub active: Option<bool>,
    pub staff_name: Option<String>,
    pub employee_code: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "course_id")]
    pub course_ids: Option<Value>,
    #[serde(rename = "semester_id")]
    pub semester_ids: Option<Value>,
    #[serde(rename = "subject_id")]
    pub subject_ids: Option<Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Presentation form of a staff record in list and write responses.
#[derive(Debug, Clone, Serialize)]
pub struct StaffWithImages {
    #[serde(flatten)]
    pub staff: StaffListItem,
    pub images: Vec<StaffImage>,
}

/// Presentation form of a single staff record, sub-records included.
#[derive(Debug, Clone, Serialize)]
pub struct StaffDetail {
    #[serde(flatten)]
    pub staff: StaffListItem,
    pub images: Vec<StaffImage>,
    pub education: Vec<StaffEducation>,
    pub papers: Vec<StaffPaper>,
}

/// Mutable staff columns. Every field is written on create and update.
#[derive(Debug, Clone, Default)]
pub struct StaffFields {
    pub staff_name: Option<String>,
    pub employee_code: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub mobile: Option<String>,
    pub course_ids: Option<Value>,
    pub semester_ids: Option<Value>,
    pub subject_ids: Option<Value>,
}

/// DTO for creating a staff record together with its account.
#[derive(Debug, Clone)]
pub struct NewStaff {
    pub account: NewAccount,
    pub fields: StaffFields,
    pub education: Vec<NewEducation>,
    pub papers: Vec<NewPaper>,
    /// Stored filenames of images already written to blob storage.
    pub image_filenames: Vec<String>,
}

/// Which stored images an update removes before appending new ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageRemoval {
    #[default]
    Keep,
    All,
    Ids(Vec<DbId>),
}

/// DTO for a full staff update, account columns included.
#[derive(Debug, Clone)]
pub struct StaffUpdate {
    pub name: String,
    pub email: String,
    pub is_active: bool,
    pub role_id: DbId,
    /// New password hash. `None` keeps the stored hash.
    pub password_hash: Option<String>,
    pub fields: StaffFields,
    /// Replacement sub-records. `None` keeps the stored ones.
    pub education: Option<Vec<NewEducation>>,
    pub papers: Option<Vec<NewPaper>>,
    pub image_removal: ImageRemoval,
    pub image_filenames: Vec<String>,
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

/// A row from the `staff_images` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StaffImage {
    pub id: DbId,
    pub staff_id: DbId,
    pub filename: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Education / papers
// ---------------------------------------------------------------------------

/// A row from the `staff_education` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StaffEducation {
    pub id: DbId,
    pub staff_id: DbId,
    pub qualification: String,
    pub college_name: String,
    pub board_university: String,
    pub passing_year: String,
    pub percentage: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEducation {
    pub qualification: String,
    pub college_name: String,
    pub board_university: String,
    pub passing_year: String,
    pub percentage: String,
}

/// A row from the `staff_papers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StaffPaper {
    pub id: DbId,
    pub staff_id: DbId,
    pub title: String,
    pub journal: Option<String>,
    pub published_year: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPaper {
    pub title: String,
    pub journal: Option<String>,
    pub published_year: Option<String>,
}
