//! Route definitions for login and logout.

use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Public routes.
///
/// ```text
/// POST /login    -> login
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new().route("/login", post(auth::login))
}

/// Routes behind the access envelope.
///
/// ```text
/// POST /logout   -> logout
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/logout", post(auth::logout))
}
