//! Route definitions for follow-ups and the dashboard.

use axum::routing::get;
use axum::Router;

use crate::handlers::{dashboard, follow_up};
use crate::state::AppState;

/// ```text
/// GET    /followup          -> index
/// POST   /followup          -> store
/// GET    /followup/{id}     -> show
/// PUT    /followup/{id}     -> update
/// DELETE /followup/{id}     -> destroy
/// GET    /all_followup      -> all
///
/// GET    /dashboard         -> dashboard::show
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/followup", get(follow_up::index).post(follow_up::store))
        .route(
            "/followup/{id}",
            get(follow_up::show)
                .put(follow_up::update)
                .delete(follow_up::destroy),
        )
        .route("/all_followup", get(follow_up::all))
        .route("/dashboard", get(dashboard::show))
}
