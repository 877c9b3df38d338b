//! Handlers for the company-type taxonomy.
//!
//! Types are not a table of their own: the list is the distinct set of
//! `type_of_company` values, and deleting a type nulls it on every company.

use axum::extract::State;
use axum::Json;
use backoffice_core::company::{ensure_type_deletable, type_removed_message};
use backoffice_core::staff::field_error;
use backoffice_db::models::company::{CompanyTypeRemoval, DeleteCompanyType};
use backoffice_db::repositories::CompanyRepo;
use validator::ValidationErrors;

use crate::error::{AppError, AppResult};
use crate::extract::FormPayload;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/company-types
pub async fn index(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Vec<String>>>> {
    let types = CompanyRepo::list_types(&state.pool).await?;
    Ok(ApiResponse::ok("Company types retrieved successfully", types))
}

/// DELETE /api/v1/company-types
///
/// Body `{ "type": "<name>" }`. "Other" can never be removed.
pub async fn destroy(
    State(state): State<AppState>,
    payload: FormPayload<DeleteCompanyType>,
) -> AppResult<Json<ApiResponse<CompanyTypeRemoval>>> {
    let Some(type_name) = payload.data.type_name else {
        let mut errors = ValidationErrors::new();
        errors.add("type", field_error("required", "The type field is required."));
        return Err(AppError::Validation(errors));
    };

    ensure_type_deletable(&type_name)?;

    let affected_companies = CompanyRepo::clear_type(&state.pool, &type_name).await?;
    tracing::info!(type_name = %type_name, affected_companies, "Company type removed");

    Ok(ApiResponse::ok(
        type_removed_message(&type_name, affected_companies),
        CompanyTypeRemoval { affected_companies },
    ))
}
