//! Handlers for login and logout.

use axum::extract::State;
use axum::http::header::USER_AGENT;
use axum::http::HeaderMap;
use axum::Json;
use backoffice_core::error::CoreError;
use backoffice_core::forms;
use backoffice_db::models::account::AccountProfile;
use backoffice_db::models::session::CreateSession;
use backoffice_db::repositories::{AccountRepo, SessionRepo};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::auth::jwt::issue_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid Credentials.";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "forms::opt_text")]
    #[validate(
        required(message = "The email field is required."),
        email(message = "The email field must be a valid email address.")
    )]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "forms::opt_text")]
    #[validate(
        required(message = "The password field is required."),
        length(min = 6, message = "The password field must be at least 6 characters.")
    )]
    pub password: Option<String>,
}

/// `data` of a successful login.
#[derive(Debug, Serialize)]
pub struct LoginData {
    #[serde(rename = "User")]
    pub user: AccountProfile,
    pub token: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/login
///
/// Authenticate with email + password and issue a bearer token.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginData>>> {
    input.validate()?;
    let email = input.email.as_deref().unwrap_or_default();
    let password = input.password.as_deref().unwrap_or_default();

    let account = AccountRepo::find_by_email(&state.pool, email)
        .await?
        .ok_or_else(|| AppError::unauthorized(INVALID_CREDENTIALS))?;

    let password_valid = verify_password(password, &account.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(account_id = account.id, "Login rejected: wrong password");
        return Err(AppError::unauthorized(INVALID_CREDENTIALS));
    }

    if !account.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    AccountRepo::record_successful_login(&state.pool, account.id).await?;

    let profile = AccountRepo::find_profile(&state.pool, account.id)
        .await?
        .ok_or_else(|| AppError::unauthorized(INVALID_CREDENTIALS))?;

    let issued = issue_token(profile.id, &profile.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    SessionRepo::create(
        &state.pool,
        &CreateSession {
            account_id: profile.id,
            token_hash: issued.session_hash,
            expires_at: issued.expires_at,
            user_agent,
        },
    )
    .await?;

    tracing::info!(account_id = profile.id, role = %profile.role, "User logged in");

    Ok(ApiResponse::ok(
        "User login successfully.",
        LoginData {
            user: profile,
            token: issued.token,
        },
    ))
}

/// POST /api/v1/logout
///
/// Revoke the presented token only; other sessions stay valid.
pub async fn logout(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Value>>> {
    SessionRepo::revoke_by_token_hash(&state.pool, &user.session_hash).await?;
    tracing::info!(account_id = user.account_id, "User logged out");
    Ok(ApiResponse::empty("User logged out successfully."))
}
