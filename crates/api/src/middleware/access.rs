//! Access-control envelope for protected routes.
//!
//! Runs as a `route_layer`, so the matched route pattern is known. Order of
//! checks: bearer token, live session, active account, role permission for
//! the matched route. Failures short-circuit with 401 or 403 before the
//! handler runs.

use axum::extract::{MatchedPath, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use backoffice_core::error::CoreError;
use backoffice_core::roles::{role_allows, route_access, RouteAccess};
use backoffice_db::repositories::{AccountRepo, SessionRepo};

use super::auth::AuthUser;
use crate::auth::jwt::{hash_token_id, validate_token};
use crate::error::AppError;
use crate::routes::API_PREFIX;
use crate::state::AppState;

const UNAUTHENTICATED: &str = "Unauthenticated.";
const FORBIDDEN: &str = "You do not have permission to perform this action.";

/// Resolve the bearer token to an [`AuthUser`] and enforce the role table.
pub async fn access_control(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request).ok_or_else(|| AppError::unauthorized(UNAUTHENTICATED))?;

    let claims = validate_token(token, &state.config.jwt)
        .map_err(|_| AppError::unauthorized(UNAUTHENTICATED))?;

    let session_hash = hash_token_id(&claims.jti);
    let session = SessionRepo::find_active_by_token_hash(&state.pool, &session_hash)
        .await?
        .ok_or_else(|| AppError::unauthorized(UNAUTHENTICATED))?;

    let profile = AccountRepo::find_profile(&state.pool, session.account_id)
        .await?
        .filter(|p| p.active)
        .ok_or_else(|| AppError::unauthorized(UNAUTHENTICATED))?;

    let method = request.method().as_str().to_string();
    let pattern = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_default();
    let relative = pattern.strip_prefix(API_PREFIX).unwrap_or(&pattern);

    let allowed = match route_access(&method, relative) {
        Some(RouteAccess::Authenticated) => true,
        Some(RouteAccess::Requires(permission)) => role_allows(&profile.role, permission),
        None => {
            tracing::warn!(%method, route = %relative, "Route missing from access table");
            false
        }
    };

    if !allowed {
        tracing::info!(
            account_id = profile.id,
            role = %profile.role,
            %method,
            route = %relative,
            "Access denied"
        );
        return Err(AppError::Core(CoreError::Forbidden(FORBIDDEN.into())));
    }

    request.extensions_mut().insert(AuthUser {
        account_id: profile.id,
        role: profile.role,
        staff_id: profile.staff_id,
        session_hash,
    });

    Ok(next.run(request).await)
}

fn bearer_token(request: &Request) -> Option<&str> {
    let header = request.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let token = header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))?
        .trim();
    (!token.is_empty()).then_some(token)
}
