//! Handlers for the `/followup` resource.

use axum::extract::{Path, Query, State};
use axum::Json;
use backoffice_core::pagination::PageInfo;
use backoffice_core::types::DbId;
use backoffice_db::models::follow_up::{FollowUpInput, FollowUpView};
use backoffice_db::repositories::FollowUpRepo;
use serde::Serialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::extract::FormPayload;
use crate::query::ListParams;
use crate::response::ApiResponse;
use crate::state::AppState;

const ENTITY: &str = "Followup";

#[derive(Debug, Serialize)]
pub struct FollowupPage {
    #[serde(rename = "Followup")]
    pub follow_ups: Vec<FollowUpView>,
    #[serde(rename = "Pagination")]
    pub pagination: PageInfo,
}

#[derive(Debug, Serialize)]
pub struct FollowupList {
    #[serde(rename = "Followup")]
    pub follow_ups: Vec<FollowUpView>,
}

#[derive(Debug, Serialize)]
pub struct FollowupOne {
    #[serde(rename = "Followup")]
    pub follow_up: FollowUpView,
}

/// GET /api/v1/followup?page=&company_id=
///
/// Oldest first.
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<ApiResponse<FollowupPage>>> {
    let company_id = params.company_id()?;
    let total = FollowUpRepo::count(&state.pool, company_id).await?;
    let page = PageInfo::new(params.page(), total);
    let follow_ups =
        FollowUpRepo::list(&state.pool, company_id, page.limit(), page.offset()).await?;

    Ok(ApiResponse::ok(
        "Followup retrieved successfully",
        FollowupPage {
            follow_ups,
            pagination: page,
        },
    ))
}

/// GET /api/v1/all_followup
pub async fn all(State(state): State<AppState>) -> AppResult<Json<ApiResponse<FollowupList>>> {
    let follow_ups = FollowUpRepo::list_all(&state.pool).await?;
    Ok(ApiResponse::ok(
        "Followup retrieved successfully",
        FollowupList { follow_ups },
    ))
}

/// GET /api/v1/followup/{id}
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<FollowupOne>>> {
    let follow_up = load_view(&state, id).await?;
    Ok(ApiResponse::ok(
        "Followup retrieved successfully",
        FollowupOne { follow_up },
    ))
}

/// POST /api/v1/followup
///
/// A missing or unknown `company_id` is rejected by the foreign key.
pub async fn store(
    State(state): State<AppState>,
    payload: FormPayload<FollowUpInput>,
) -> AppResult<Json<ApiResponse<FollowupOne>>> {
    let created = FollowUpRepo::create(&state.pool, &payload.data).await?;
    tracing::info!(
        follow_up_id = created.id,
        company_id = created.company_id,
        "Follow-up created"
    );
    let follow_up = load_view(&state, created.id).await?;
    Ok(ApiResponse::ok(
        "Followup stored successfully",
        FollowupOne { follow_up },
    ))
}

/// PUT /api/v1/followup/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    payload: FormPayload<FollowUpInput>,
) -> AppResult<Json<ApiResponse<FollowupOne>>> {
    FollowUpRepo::update(&state.pool, id, &payload.data)
        .await?
        .ok_or_else(|| AppError::not_found(ENTITY, id))?;
    tracing::info!(follow_up_id = id, "Follow-up updated");
    let follow_up = load_view(&state, id).await?;
    Ok(ApiResponse::ok(
        "Followup updated successfully",
        FollowupOne { follow_up },
    ))
}

/// DELETE /api/v1/followup/{id}
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Value>>> {
    if !FollowUpRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found(ENTITY, id));
    }
    tracing::info!(follow_up_id = id, "Follow-up deleted");
    Ok(ApiResponse::empty("Followup deleted successfully"))
}

async fn load_view(state: &AppState, id: DbId) -> AppResult<FollowUpView> {
    FollowUpRepo::find_view(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(ENTITY, id))
}
