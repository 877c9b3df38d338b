//! Authenticated identity extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use backoffice_core::types::DbId;

use crate::error::AppError;

/// The account behind the current request.
///
/// Inserted into request extensions by
/// [`access_control`](super::access::access_control); handlers take it as an
/// extractor:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(account_id = user.account_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub account_id: DbId,
    /// Current role name, read from the database on every request.
    pub role: String,
    /// Linked staff record, if the account has one.
    pub staff_id: Option<DbId>,
    /// Session key of the presented token; logout revokes exactly this.
    pub session_hash: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized("Unauthenticated."))
    }
}
