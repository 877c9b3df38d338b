//! Handlers for the `/staff` resource.
//!
//! Create and update accept JSON or `multipart/form-data`; image uploads
//! arrive as `images[]` file parts. Blobs are written before the database
//! call and removed again if it fails, so a failed request leaves no files
//! behind.

use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use backoffice_core::error::CoreError;
use backoffice_core::pagination::PageInfo;
use backoffice_core::staff::{
    check_images, field_error, is_clean, EducationInput, FormMode, ImageCandidate, PaperInput,
    StaffInput,
};
use backoffice_core::types::DbId;
use backoffice_db::models::account::NewAccount;
use backoffice_db::models::staff::{
    ImageRemoval, NewEducation, NewPaper, NewStaff, StaffDetail, StaffFields, StaffUpdate,
    StaffWithImages,
};
use backoffice_db::repositories::{AccountRepo, RoleRepo, StaffRepo};
use serde::Serialize;
use serde_json::Value;
use validator::ValidationErrors;

use crate::auth::password::hash_password;
use crate::documents;
use crate::error::{AppError, AppResult};
use crate::extract::{FormPayload, UploadedFile};
use crate::query::ListParams;
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::storage::StorageDir;

const ENTITY: &str = "Staff";
const IMAGE_FIELD: &str = "images";

// ---------------------------------------------------------------------------
// Response payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct StaffPage {
    #[serde(rename = "Staff")]
    pub staff: Vec<StaffWithImages>,
    #[serde(rename = "Pagination")]
    pub pagination: PageInfo,
}

#[derive(Debug, Serialize)]
pub struct StaffList {
    #[serde(rename = "Staff")]
    pub staff: Vec<StaffWithImages>,
}

#[derive(Debug, Serialize)]
pub struct StaffOne {
    #[serde(rename = "Staff")]
    pub staff: StaffDetail,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/staff?page=&search=&role=
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<ApiResponse<StaffPage>>> {
    let pattern = params.search_pattern();
    let role = params.role();

    let total = StaffRepo::count(&state.pool, pattern.as_deref(), role.as_deref()).await?;
    let page = PageInfo::new(params.page(), total);
    let staff = StaffRepo::list(
        &state.pool,
        pattern.as_deref(),
        role.as_deref(),
        page.limit(),
        page.offset(),
    )
    .await?;

    Ok(ApiResponse::ok(
        "Staff retrieved successfully",
        StaffPage {
            staff,
            pagination: page,
        },
    ))
}

/// GET /api/v1/all_staff
pub async fn all(State(state): State<AppState>) -> AppResult<Json<ApiResponse<StaffList>>> {
    let staff = StaffRepo::list_all(&state.pool).await?;
    Ok(ApiResponse::ok(
        "Staff retrieved successfully",
        StaffList { staff },
    ))
}

/// GET /api/v1/staff/{id}
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<StaffOne>>> {
    let staff = load_detail(&state, id).await?;
    Ok(ApiResponse::ok(
        "Staff retrieved successfully",
        StaffOne { staff },
    ))
}

/// POST /api/v1/staff
///
/// Creates the login account and the staff record in one transaction.
pub async fn store(
    State(state): State<AppState>,
    payload: FormPayload<StaffInput>,
) -> AppResult<Json<ApiResponse<StaffOne>>> {
    let input = &payload.data;
    let images: Vec<&UploadedFile> = payload.files_named(IMAGE_FIELD).collect();

    let mut errors = input.field_errors(FormMode::Create);
    check_uploads(&mut errors, &images);
    check_unique(&state, input, &mut errors, None, None).await?;
    if !is_clean(&errors) {
        return Err(AppError::Validation(errors));
    }

    let role_id = resolve_role_id(&state, input).await?;
    let password = input.new_password().unwrap_or_default();
    let password_hash = hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let image_filenames = store_uploads(&state, &images).await?;

    let new_staff = NewStaff {
        account: NewAccount {
            name: input.name.clone().unwrap_or_default(),
            email: input.email.clone().unwrap_or_default(),
            password_hash,
            role_id,
        },
        fields: staff_fields(input),
        education: input.education.as_deref().map(education).unwrap_or_default(),
        papers: input.papers.as_deref().map(papers).unwrap_or_default(),
        image_filenames,
    };

    let created = match StaffRepo::create(&state.pool, &new_staff).await {
        Ok(staff) => staff,
        Err(e) => {
            state
                .storage
                .remove_all(StorageDir::StaffImages, &new_staff.image_filenames)
                .await;
            return Err(e.into());
        }
    };

    tracing::info!(
        staff_id = created.id,
        account_id = created.account_id,
        images = new_staff.image_filenames.len(),
        "Staff created"
    );

    let staff = load_detail(&state, created.id).await?;
    Ok(ApiResponse::ok(
        "Staff stored successfully",
        StaffOne { staff },
    ))
}

/// PUT /api/v1/staff/{id}
///
/// Full overwrite. The password changes only when a non-empty one is sent;
/// a missing display name keeps the stored one; `active` defaults to true.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    payload: FormPayload<StaffInput>,
) -> AppResult<Json<ApiResponse<StaffOne>>> {
    let existing = StaffRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(ENTITY, id))?;
    let account = AccountRepo::find_profile(&state.pool, existing.account_id)
        .await?
        .ok_or_else(|| AppError::not_found(ENTITY, id))?;

    let input = &payload.data;
    let images: Vec<&UploadedFile> = payload.files_named(IMAGE_FIELD).collect();

    let mut errors = input.field_errors(FormMode::Update);
    check_uploads(&mut errors, &images);
    check_unique(&state, input, &mut errors, Some(account.id), Some(id)).await?;
    if !is_clean(&errors) {
        return Err(AppError::Validation(errors));
    }

    let role_id = resolve_role_id(&state, input).await?;
    let password_hash = input
        .new_password()
        .map(hash_password)
        .transpose()
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let image_filenames = store_uploads(&state, &images).await?;

    let changes = StaffUpdate {
        name: input.name.clone().unwrap_or(account.name),
        email: input.email.clone().unwrap_or_default(),
        is_active: input.active.unwrap_or(true),
        role_id,
        password_hash,
        fields: staff_fields(input),
        education: input.education.as_deref().map(education),
        papers: input.papers.as_deref().map(papers),
        image_removal: image_removal(input),
        image_filenames,
    };

    let removed = match StaffRepo::update(&state.pool, &existing, &changes).await {
        Ok(removed) => removed,
        Err(e) => {
            state
                .storage
                .remove_all(StorageDir::StaffImages, &changes.image_filenames)
                .await;
            return Err(e.into());
        }
    };
    state
        .storage
        .remove_all(StorageDir::StaffImages, &removed)
        .await;

    tracing::info!(
        staff_id = id,
        added_images = changes.image_filenames.len(),
        removed_images = removed.len(),
        password_changed = changes.password_hash.is_some(),
        "Staff updated"
    );

    let staff = load_detail(&state, id).await?;
    Ok(ApiResponse::ok(
        "Staff updated successfully",
        StaffOne { staff },
    ))
}

/// DELETE /api/v1/staff/{id}
///
/// Removes images, sub-records, the account and the record, then the blobs.
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let removed = StaffRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(ENTITY, id))?;

    state
        .storage
        .remove_all(StorageDir::StaffImages, &removed)
        .await;

    tracing::info!(staff_id = id, images = removed.len(), "Staff deleted");
    Ok(ApiResponse::empty("Staff deleted successfully"))
}

/// GET /api/v1/staff/{id}/pdf
pub async fn pdf(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let detail = load_detail(&state, id).await?;
    let bytes = documents::staff_pdf(&detail)
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        documents::staff_pdf_file_name(id)
    );
    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, "application/pdf".to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_detail(state: &AppState, id: DbId) -> AppResult<StaffDetail> {
    StaffRepo::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(ENTITY, id))
}

fn check_uploads(errors: &mut ValidationErrors, images: &[&UploadedFile]) {
    let candidates: Vec<ImageCandidate<'_>> = images
        .iter()
        .map(|f| ImageCandidate {
            file_name: &f.file_name,
            bytes: &f.bytes,
        })
        .collect();
    check_images(errors, &candidates);
}

/// Add uniqueness failures for email, staff name and employee code.
async fn check_unique(
    state: &AppState,
    input: &StaffInput,
    errors: &mut ValidationErrors,
    account_id: Option<DbId>,
    staff_id: Option<DbId>,
) -> AppResult<()> {
    if let Some(email) = &input.email {
        if AccountRepo::email_taken(&state.pool, email, account_id).await? {
            errors.add(
                "email",
                field_error("unique", "The email has already been taken."),
            );
        }
    }
    if let Some(name) = &input.staff_name {
        if StaffRepo::staff_name_taken(&state.pool, name, staff_id).await? {
            errors.add(
                "staff_name",
                field_error("unique", "The staff name has already been taken."),
            );
        }
    }
    if let Some(code) = &input.employee_code {
        if StaffRepo::employee_code_taken(&state.pool, code, staff_id).await? {
            errors.add(
                "employee_code",
                field_error("unique", "The employee code has already been taken."),
            );
        }
    }
    Ok(())
}

async fn resolve_role_id(state: &AppState, input: &StaffInput) -> AppResult<DbId> {
    let role = input.resolved_role().map_err(|e| {
        AppError::Core(CoreError::Validation(e))
    })?;
    RoleRepo::id_of(&state.pool, role).await?.ok_or_else(|| {
        AppError::InternalError(format!("Role '{role}' is missing from the roles table"))
    })
}

/// Write uploads to blob storage. On failure the files already written are
/// removed before the error is returned.
async fn store_uploads(state: &AppState, images: &[&UploadedFile]) -> AppResult<Vec<String>> {
    let mut stored = Vec::with_capacity(images.len());
    for file in images {
        match state
            .storage
            .put(StorageDir::StaffImages, &file.file_name, &file.bytes)
            .await
        {
            Ok(name) => stored.push(name),
            Err(e) => {
                state
                    .storage
                    .remove_all(StorageDir::StaffImages, &stored)
                    .await;
                return Err(AppError::InternalError(format!(
                    "Failed to store upload '{}': {e}",
                    file.file_name
                )));
            }
        }
    }
    Ok(stored)
}

fn staff_fields(input: &StaffInput) -> StaffFields {
    StaffFields {
        staff_name: input.staff_name.clone(),
        employee_code: input.employee_code.clone(),
        date_of_birth: input.birth_date(),
        address: input.address.clone(),
        mobile: input.mobile.clone(),
        course_ids: input.course_id.clone().map(Value::Array),
        semester_ids: input.semester_id.clone().map(Value::Array),
        subject_ids: input.subject_id.clone().map(Value::Array),
    }
}

fn image_removal(input: &StaffInput) -> ImageRemoval {
    if input.delete_existing_images == Some(true) {
        return ImageRemoval::All;
    }
    match &input.deleted_image_ids {
        Some(ids) if !ids.is_empty() => ImageRemoval::Ids(ids.clone()),
        _ => ImageRemoval::Keep,
    }
}

// Entries were checked by `field_errors`, so every required field is set.
fn education(entries: &[EducationInput]) -> Vec<NewEducation> {
    entries
        .iter()
        .map(|e| NewEducation {
            qualification: e.qualification.clone().unwrap_or_default(),
            college_name: e.college_name.clone().unwrap_or_default(),
            board_university: e.board_university.clone().unwrap_or_default(),
            passing_year: e.passing_year.clone().unwrap_or_default(),
            percentage: e.percentage.clone().unwrap_or_default(),
        })
        .collect()
}

fn papers(entries: &[PaperInput]) -> Vec<NewPaper> {
    entries
        .iter()
        .map(|p| NewPaper {
            title: p.title.clone().unwrap_or_default(),
            journal: p.journal.clone(),
            published_year: p.published_year.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_removal_priority() {
        let mut input = StaffInput {
            delete_existing_images: Some(true),
            deleted_image_ids: Some(vec![4, 5]),
            ..Default::default()
        };
        assert_eq!(image_removal(&input), ImageRemoval::All);

        input.delete_existing_images = Some(false);
        assert_eq!(image_removal(&input), ImageRemoval::Ids(vec![4, 5]));

        input.deleted_image_ids = Some(Vec::new());
        assert_eq!(image_removal(&input), ImageRemoval::Keep);
    }

    #[test]
    fn id_lists_are_stored_as_json_arrays() {
        let input = StaffInput {
            course_id: Some(vec![Value::from(1), Value::from(2)]),
            ..Default::default()
        };
        let fields = staff_fields(&input);
        assert_eq!(fields.course_ids, Some(serde_json::json!([1, 2])));
        assert_eq!(fields.semester_ids, None);
    }
}
