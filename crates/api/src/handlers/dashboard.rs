//! Dashboard aggregate for the signed-in staff member.

use axum::extract::{Query, State};
use axum::Json;
use backoffice_core::pagination::PageInfo;
use backoffice_db::models::dashboard::StaffSummary;
use backoffice_db::models::follow_up::FollowUpView;
use backoffice_db::repositories::{DashboardRepo, FollowUpRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::handlers::follow_up::FollowupPage;
use crate::middleware::auth::AuthUser;
use crate::query::ListParams;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DashboardData {
    pub staff_summary: StaffSummary,
    pub next_upcoming_follow_up: Option<FollowUpView>,
    pub follow_ups: FollowupPage,
}

/// GET /api/v1/dashboard?page=&company_name=
///
/// Totals, the next upcoming follow-up and a follow-up page filtered by
/// company name. Accounts without a staff record get 401.
pub async fn show(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<ListParams>,
) -> AppResult<Json<ApiResponse<DashboardData>>> {
    if user.staff_id.is_none() {
        return Err(AppError::unauthorized(
            "User or staff details not found. Unable to load dashboard data.",
        ));
    }

    let staff_summary = DashboardRepo::staff_summary(&state.pool).await?;
    let next_upcoming_follow_up = FollowUpRepo::next_upcoming(&state.pool).await?;

    let pattern = params.company_name_pattern();
    let total = FollowUpRepo::count_by_company_name(&state.pool, pattern.as_deref()).await?;
    let page = PageInfo::new(params.page(), total);
    let follow_ups = FollowUpRepo::list_by_company_name(
        &state.pool,
        pattern.as_deref(),
        page.limit(),
        page.offset(),
    )
    .await?;

    Ok(ApiResponse::ok(
        "Dashboard data retrieved successfully",
        DashboardData {
            staff_summary,
            next_upcoming_follow_up,
            follow_ups: FollowupPage {
                follow_ups,
                pagination: page,
            },
        },
    ))
}
