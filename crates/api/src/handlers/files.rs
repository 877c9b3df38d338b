//! Serving stored staff files by name.

use axum::extract::{Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use backoffice_core::error::CoreError;

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::storage::{content_type_for, STAFF_FILE_SEARCH_ORDER};

/// GET /api/v1/staff-file/{filename}
///
/// Looks in each staff storage directory in turn and serves the first hit
/// inline.
pub async fn staff_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> AppResult<impl IntoResponse> {
    let path = state
        .storage
        .locate(&STAFF_FILE_SEARCH_ORDER, &filename)
        .await
        .ok_or_else(|| AppError::Core(CoreError::DocumentNotFound(filename.clone())))?;

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to read {}: {e}", path.display())))?;

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, content_type_for(&filename).to_string()),
            (
                CONTENT_DISPOSITION,
                format!("inline; filename=\"{filename}\""),
            ),
        ],
        bytes,
    ))
}
