//! Handlers for the `/companies` resource, bulk import and brochure mail.

use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use backoffice_core::company::{
    BROCHURE_BODY, BROCHURE_CONTENT_TYPE, BROCHURE_FILE_NAME, BROCHURE_SUBJECT, STATUS_INTERESTED,
};
use backoffice_core::error::CoreError;
use backoffice_core::import::{self, ImportOutcome, ImportSummary};
use backoffice_core::pagination::PageInfo;
use backoffice_core::spreadsheet::{self, SheetFormat, TEMPLATE_FILE_NAME, XLSX_CONTENT_TYPE};
use backoffice_core::staff::{field_error, is_clean};
use backoffice_core::types::DbId;
use backoffice_db::models::company::{Company, CompanyInput, SendBrochure};
use backoffice_db::repositories::CompanyRepo;
use backoffice_mail::{Attachment, OutgoingEmail};
use serde::Serialize;
use serde_json::Value;
use validator::{ValidateEmail, ValidationErrors};

use crate::documents;
use crate::error::{AppError, AppResult};
use crate::extract::FormPayload;
use crate::query::ListParams;
use crate::response::ApiResponse;
use crate::state::AppState;

const ENTITY: &str = "Company";
const FILE_FIELD: &str = "file";
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Serialize)]
pub struct CompanyPage {
    #[serde(rename = "Company")]
    pub companies: Vec<Company>,
    #[serde(rename = "Pagination")]
    pub pagination: PageInfo,
}

#[derive(Debug, Serialize)]
pub struct CompanyList {
    #[serde(rename = "Company")]
    pub companies: Vec<Company>,
}

#[derive(Debug, Serialize)]
pub struct CompanyOne {
    #[serde(rename = "Company")]
    pub company: Company,
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/companies?page=&search=
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<ApiResponse<CompanyPage>>> {
    let pattern = params.search_pattern();
    let total = CompanyRepo::count(&state.pool, pattern.as_deref()).await?;
    let page = PageInfo::new(params.page(), total);
    let companies =
        CompanyRepo::list(&state.pool, pattern.as_deref(), page.limit(), page.offset()).await?;

    Ok(ApiResponse::ok(
        "Company retrieved successfully",
        CompanyPage {
            companies,
            pagination: page,
        },
    ))
}

/// GET /api/v1/all_companies
pub async fn all(State(state): State<AppState>) -> AppResult<Json<ApiResponse<CompanyList>>> {
    let companies = CompanyRepo::list_all(&state.pool).await?;
    Ok(ApiResponse::ok(
        "Company retrieved successfully",
        CompanyList { companies },
    ))
}

/// GET /api/v1/companies/{id}
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<CompanyOne>>> {
    let company = CompanyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(ENTITY, id))?;
    Ok(ApiResponse::ok(
        "Company retrieved successfully",
        CompanyOne { company },
    ))
}

/// POST /api/v1/companies
///
/// Status is always `waiting` on creation, whatever the body says.
pub async fn store(
    State(state): State<AppState>,
    payload: FormPayload<CompanyInput>,
) -> AppResult<Json<ApiResponse<CompanyOne>>> {
    let company = CompanyRepo::create(&state.pool, &payload.data).await?;
    tracing::info!(company_id = company.id, "Company created");
    Ok(ApiResponse::ok(
        "Company stored successfully",
        CompanyOne { company },
    ))
}

/// PUT /api/v1/companies/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    payload: FormPayload<CompanyInput>,
) -> AppResult<Json<ApiResponse<CompanyOne>>> {
    let company = CompanyRepo::update(&state.pool, id, &payload.data)
        .await?
        .ok_or_else(|| AppError::not_found(ENTITY, id))?;
    tracing::info!(company_id = id, "Company updated");
    Ok(ApiResponse::ok(
        "Company updated successfully",
        CompanyOne { company },
    ))
}

/// DELETE /api/v1/companies/{id}
///
/// Follow-ups go with the company through the foreign-key cascade.
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Value>>> {
    if !CompanyRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found(ENTITY, id));
    }
    tracing::info!(company_id = id, "Company deleted");
    Ok(ApiResponse::empty("Company deleted successfully"))
}

// ---------------------------------------------------------------------------
// Import / template
// ---------------------------------------------------------------------------

/// POST /api/v1/companies/importCompany
///
/// Header problems reject the whole file; after that every row is saved on
/// its own and failures are reported as `Row N: reason`.
pub async fn import(
    State(state): State<AppState>,
    payload: FormPayload<Value>,
) -> AppResult<Json<ApiResponse<ImportSummary>>> {
    let file = payload
        .files_named(FILE_FIELD)
        .next()
        .ok_or_else(|| file_error("required", "The file field is required."))?;

    let format = SheetFormat::from_file_name(&file.file_name)
        .map_err(|e| file_error("mimes", core_message(e)))?;
    let rows = spreadsheet::read_rows(format, &file.bytes)?;
    let prepared = import::prepare(&rows)?;

    let mut outcome = ImportOutcome::default();
    for row in prepared {
        let row_number = row.row_number;
        if let Err(reason) = row.check() {
            outcome.record_failure(row_number, reason);
            continue;
        }
        match CompanyRepo::create(&state.pool, &CompanyInput::from(row)).await {
            Ok(_) => outcome.record_success(),
            Err(e) if is_unique_violation(&e) => {
                outcome.record_failure(row_number, "Duplicate company name.");
            }
            Err(e) => {
                tracing::error!(row = row_number, error = %e, "Import row failed");
                outcome.record_failure(row_number, "Could not save the row.");
            }
        }
    }

    tracing::info!(
        file = %file.file_name,
        imported = outcome.imported,
        failed = outcome.failures.len(),
        "Company import finished"
    );
    Ok(ApiResponse::ok(outcome.message(), outcome.summary()))
}

/// GET /api/v1/companies/download-template
pub async fn download_template() -> AppResult<impl IntoResponse> {
    let bytes = spreadsheet::template_xlsx()?;
    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{TEMPLATE_FILE_NAME}\""),
            ),
        ],
        bytes,
    ))
}

// ---------------------------------------------------------------------------
// Brochure
// ---------------------------------------------------------------------------

/// POST /api/v1/companies/send-brochure
///
/// The status flips to `interested` only after the mail went out.
pub async fn send_brochure(
    State(state): State<AppState>,
    payload: FormPayload<SendBrochure>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let input = payload.data;
    let mut errors = ValidationErrors::new();

    match input.company_id {
        None => errors.add(
            "companyId",
            field_error("required", "The company id field is required."),
        ),
        Some(id) if !CompanyRepo::exists(&state.pool, id).await? => errors.add(
            "companyId",
            field_error("exists", "The selected company id is invalid."),
        ),
        Some(_) => {}
    }
    match &input.email {
        None => errors.add(
            "email",
            field_error("required", "The email field is required."),
        ),
        Some(email) if !email.validate_email() => errors.add(
            "email",
            field_error("email", "The email field must be a valid email address."),
        ),
        Some(_) => {}
    }
    if !is_clean(&errors) {
        return Err(AppError::Validation(errors));
    }
    let (Some(company_id), Some(email)) = (input.company_id, input.email) else {
        return Err(AppError::InternalError("Brochure input lost after validation".into()));
    };

    let brochure = load_brochure(&state).await?;
    state
        .mailer
        .send(OutgoingEmail {
            to: email.clone(),
            subject: BROCHURE_SUBJECT.to_string(),
            body: BROCHURE_BODY.to_string(),
            attachments: vec![Attachment {
                file_name: BROCHURE_FILE_NAME.to_string(),
                content_type: BROCHURE_CONTENT_TYPE.to_string(),
                data: brochure,
            }],
        })
        .await?;

    if CompanyRepo::set_status(&state.pool, company_id, STATUS_INTERESTED).await? {
        tracing::info!(company_id, to = %email, "Brochure sent");
    } else {
        tracing::warn!(
            company_id,
            to = %email,
            "Brochure sent but the company no longer exists; status not updated"
        );
    }

    Ok(ApiResponse::empty("Brochure sent successfully"))
}

/// The configured brochure file, or the generated fallback.
async fn load_brochure(state: &AppState) -> AppResult<Vec<u8>> {
    match &state.config.storage.brochure_path {
        Some(path) => tokio::fs::read(path).await.map_err(|e| {
            AppError::InternalError(format!(
                "Failed to read brochure {}: {e}",
                path.display()
            ))
        }),
        None => documents::default_brochure().map_err(|e| AppError::InternalError(e.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn file_error(code: &'static str, message: impl Into<String>) -> AppError {
    let mut errors = ValidationErrors::new();
    errors.add(FILE_FIELD, field_error(code, message.into()));
    AppError::Validation(errors)
}

fn core_message(error: CoreError) -> String {
    match error {
        CoreError::Validation(message) => message,
        other => other.to_string(),
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == UNIQUE_VIOLATION)
}
