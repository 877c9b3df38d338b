//! Route definitions for the staff resource and its files.

use axum::routing::get;
use axum::Router;

use crate::handlers::{files, staff};
use crate::state::AppState;

/// ```text
/// GET    /staff                   -> index
/// POST   /staff                   -> store
/// GET    /staff/{id}              -> show
/// PUT    /staff/{id}              -> update
/// DELETE /staff/{id}              -> destroy
/// GET    /staff/{id}/pdf          -> pdf
/// GET    /all_staff               -> all
/// GET    /staff-file/{filename}   -> staff_file
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/staff", get(staff::index).post(staff::store))
        .route(
            "/staff/{id}",
            get(staff::show).put(staff::update).delete(staff::destroy),
        )
        .route("/staff/{id}/pdf", get(staff::pdf))
        .route("/all_staff", get(staff::all))
        .route("/staff-file/{filename}", get(files::staff_file))
}
