//! Company bulk import: header mapping, row extraction and outcome summary.
//!
//! The header check is all-or-nothing; rows are then handled one at a time
//! and each failure is recorded against its spreadsheet row number.

use std::fmt;

use serde::Serialize;

use crate::error::CoreError;

/// Row number of the first data row (row 1 is the header).
const FIRST_DATA_ROW: usize = 2;

/// A company column as it appears in the spreadsheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub field: &'static str,
    pub label: &'static str,
}

/// Columns every import file must carry, in template order.
pub const REQUIRED_COLUMNS: [Column; 7] = [
    Column { field: "company_name", label: "Company Name" },
    Column { field: "type_of_company", label: "Type Of Company" },
    Column { field: "street_address", label: "Street Address" },
    Column { field: "state", label: "State" },
    Column { field: "pincode", label: "Pincode" },
    Column { field: "contact_person", label: "Contact Person" },
    Column { field: "contact_mobile", label: "Contact Mobile" },
];

/// Extra columns offered by the template. The importer ignores them.
pub const OPTIONAL_COLUMNS: [Column; 10] = [
    Column { field: "area", label: "Area" },
    Column { field: "city", label: "City" },
    Column { field: "country", label: "Country" },
    Column { field: "contact_person_designation", label: "Contact Person Designation" },
    Column { field: "contact_email", label: "Contact Email" },
    Column { field: "alternate_contact_person", label: "Alternate Contact Person" },
    Column {
        field: "alternate_contact_person_designation",
        label: "Alternate Contact Person Designation",
    },
    Column { field: "alternate_contact_email", label: "Alternate Contact Email" },
    Column { field: "alternate_contact_mobile", label: "Alternate Contact Mobile" },
    Column { field: "other_type_of_company", label: "Other Type Of Company" },
];

pub const EMPTY_FILE_MESSAGE: &str =
    "The uploaded file is empty or does not contain any data rows.";

/// Position of each required column in the header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    indices: [usize; REQUIRED_COLUMNS.len()],
}

impl ColumnMap {
    /// Map the header row, failing on the first missing required column.
    pub fn from_header(header: &[String]) -> Result<Self, CoreError> {
        let trimmed: Vec<&str> = header.iter().map(|h| h.trim()).collect();
        let mut indices = [0; REQUIRED_COLUMNS.len()];
        for (slot, column) in indices.iter_mut().zip(REQUIRED_COLUMNS.iter()) {
            *slot = trimmed
                .iter()
                .position(|h| *h == column.label)
                .ok_or_else(|| {
                    CoreError::Validation(format!(
                        "Required column '{}' not found in the uploaded file.",
                        column.label
                    ))
                })?;
        }
        Ok(Self { indices })
    }

    fn cell(&self, row: &[String], column: usize) -> Option<String> {
        row.get(self.indices[column])
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }
}

/// One data row mapped onto the required company fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportRow {
    /// 1-based spreadsheet row number, header included.
    pub row_number: usize,
    pub company_name: Option<String>,
    pub type_of_company: Option<String>,
    pub street_address: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub contact_person: Option<String>,
    pub contact_mobile: Option<String>,
}

impl ImportRow {
    /// Check the row before it is persisted.
    pub fn check(&self) -> Result<(), String> {
        if self.company_name.is_none() {
            return Err("Company Name is required.".to_string());
        }
        Ok(())
    }
}

/// Validate the sheet shape and return its mapped, non-blank data rows.
pub fn prepare(rows: &[Vec<String>]) -> Result<Vec<ImportRow>, CoreError> {
    if rows.len() < FIRST_DATA_ROW {
        return Err(CoreError::Validation(EMPTY_FILE_MESSAGE.to_string()));
    }

    let map = ColumnMap::from_header(&rows[0])?;

    Ok(rows[1..]
        .iter()
        .enumerate()
        .filter(|(_, row)| !is_blank(row))
        .map(|(index, row)| ImportRow {
            row_number: index + FIRST_DATA_ROW,
            company_name: map.cell(row, 0),
            type_of_company: map.cell(row, 1),
            street_address: map.cell(row, 2),
            state: map.cell(row, 3),
            pincode: map.cell(row, 4),
            contact_person: map.cell(row, 5),
            contact_mobile: map.cell(row, 6),
        })
        .collect())
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// A row that could not be imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportFailure {
    pub row: usize,
    pub reason: String,
}

impl fmt::Display for ImportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {}: {}", self.row, self.reason)
    }
}

/// Result of an import run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOutcome {
    pub imported: usize,
    pub failures: Vec<ImportFailure>,
}

/// Response body of an import run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    #[serde(rename = "errorRows", skip_serializing_if = "Option::is_none")]
    pub error_rows: Option<Vec<usize>>,
}

impl ImportOutcome {
    pub fn record_success(&mut self) {
        self.imported += 1;
    }

    pub fn record_failure(&mut self, row: usize, reason: impl Into<String>) {
        self.failures.push(ImportFailure {
            row,
            reason: reason.into(),
        });
    }

    pub fn message(&self) -> String {
        match (self.imported, self.failures.is_empty()) {
            (n, true) => format!("Successfully imported {n} companies"),
            (0, false) => "No companies were imported. Please check the errors.".to_string(),
            (n, false) => format!("Imported {n} companies with some errors."),
        }
    }

    pub fn summary(&self) -> ImportSummary {
        if self.failures.is_empty() {
            return ImportSummary {
                count: self.imported,
                errors: None,
                error_rows: None,
            };
        }
        ImportSummary {
            count: self.imported,
            errors: Some(self.failures.iter().map(ToString::to_string).collect()),
            error_rows: Some(self.failures.iter().map(|f| f.row).collect()),
        }
    }
}
