//! Company (lead) records.

use backoffice_core::company::stored_type_columns;
use backoffice_core::forms;
use backoffice_core::import::ImportRow;
use backoffice_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `companies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Company {
    pub id: DbId,
    pub company_name: String,
    pub type_of_company: Option<String>,
    pub other_type_of_company: Option<String>,
    pub street_address: Option<String>,
    pub area: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub country: Option<String>,
    pub contact_person: Option<String>,
    pub contact_person_designation: Option<String>,
    pub contact_email: Option<String>,
    pub contact_mobile: Option<String>,
    pub alternate_contact_person: Option<String>,
    pub alternate_contact_person_designation: Option<String>,
    pub alternate_contact_email: Option<String>,
    pub alternate_contact_mobile: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Company create/update body.
///
/// Carries no validation rules; whatever the client sends is stored, and
/// the database constraints are the only gate.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyInput {
    #[serde(default, deserialize_with = "forms::opt_text")]
    pub company_name: Option<String>,
    #[serde(default, deserialize_with = "forms::opt_text")]
    pub type_of_company: Option<String>,
    #[serde(default, deserialize_with = "forms::opt_text")]
    pub other_type_of_company: Option<String>,
    #[serde(default, deserialize_with = "forms::opt_text")]
    pub street_address: Option<String>,
    #[serde(default, deserialize_with = "forms::opt_text")]
    pub area: Option<String>,
    #[serde(default, deserialize_with = "forms::opt_text")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "forms::opt_text")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "forms::opt_text")]
    pub pincode: Option<String>,
    #[serde(default, deserialize_with = "forms::opt_text")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "forms::opt_text")]
    pub contact_person: Option<String>,
    #[serde(default, deserialize_with = "forms::opt_text")]
    pub contact_person_designation: Option<String>,
    #[serde(default, deserialize_with = "forms::opt_text")]
    pub contact_email: Option<String>,
    #[serde(default, deserialize_with = "forms::opt_text")]
    pub contact_mobile: Option<String>,
    #[serde(default, deserialize_with = "forms::opt_text")]
    pub alternate_contact_person: Option<String>,
    #[serde(default, deserialize_with = "forms::opt_text")]
    pub alternate_contact_person_designation: Option<String>,
    #[serde(default, deserialize_with = "forms::opt_text")]
    pub alternate_contact_email: Option<String>,
    #[serde(default, deserialize_with = "forms::opt_text")]
    pub alternate_contact_mobile: Option<String>,
}

impl CompanyInput {
    /// `(type_of_company, other_type_of_company)` as they should be stored.
    pub fn type_columns(&self) -> (Option<String>, Option<String>) {
        stored_type_columns(
            self.type_of_company.as_deref(),
            self.other_type_of_company.as_deref(),
        )
    }
}

impl From<ImportRow> for CompanyInput {
    fn from(row: ImportRow) -> Self {
        Self {
            company_name: row.company_name,
            type_of_company: row.type_of_company,
            street_address: row.street_address,
            state: row.state,
            pincode: row.pincode,
            contact_person: row.contact_person,
            contact_mobile: row.contact_mobile,
            ..Default::default()
        }
    }
}

/// Body of `POST /companies/send-brochure`.
#[derive(Debug, Clone, Deserialize)]
pub struct SendBrochure {
    #[serde(rename = "companyId", default, deserialize_with = "forms::opt_id")]
    pub company_id: Option<DbId>,
    #[serde(default, deserialize_with = "forms::opt_text")]
    pub email: Option<String>,
}

/// Body of `DELETE /company-types`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteCompanyType {
    #[serde(rename = "type", default, deserialize_with = "forms::opt_text")]
    pub type_name: Option<String>,
}

/// Response of `DELETE /company-types`.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyTypeRemoval {
    pub affected_companies: u64,
}
