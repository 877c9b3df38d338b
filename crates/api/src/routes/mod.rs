pub mod auth;
pub mod company;
pub mod follow_up;
pub mod health;
pub mod staff;

use axum::middleware::{from_fn, from_fn_with_state};
use axum::Router;

use crate::middleware::access::access_control;
use crate::middleware::normalize::normalize_json_body;
use crate::state::AppState;

/// Prefix every API route is nested under.
pub const API_PREFIX: &str = "/api/v1";

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /login                             login (public)
/// /logout                            revoke the presented token
///
/// /staff                             list, create
/// /staff/{id}                        get, update, delete
/// /staff/{id}/pdf                    PDF export
/// /all_staff                         unpaginated list
/// /staff-file/{filename}             stored staff file
///
/// /companies                         list, create
/// /companies/{id}                    get, update, delete
/// /all_companies                     unpaginated list
/// /companies/importCompany           bulk import (xlsx, xls, csv)
/// /companies/download-template       import template
/// /companies/send-brochure           mail the brochure
/// /company-types                     list, delete one type
///
/// /followup                          list, create
/// /followup/{id}                     get, update, delete
/// /all_followup                      unpaginated list
///
/// /dashboard                         totals and follow-ups
/// ```
///
/// Everything except `/login` runs behind [`access_control`], which checks
/// the matched route against the role table. Sentinel-null normalization of
/// JSON bodies applies to every route.
pub fn api_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .merge(auth::router())
        .merge(staff::router())
        .merge(company::router())
        .merge(follow_up::router())
        .route_layer(from_fn_with_state(state, access_control));

    Router::new()
        .merge(auth::public_router())
        .merge(protected)
        .layer(from_fn(normalize_json_body))
}
