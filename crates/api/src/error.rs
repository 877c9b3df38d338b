use std::any::Any;
use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use backoffice_core::error::CoreError;
use backoffice_mail::MailError;
use serde_json::{json, Value};
use sqlx::postgres::PgDatabaseError;
use validator::ValidationErrors;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Every variant renders the failure envelope
/// `{ "status": false, "message": ..., "errors": ... }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Field-level validation failures, rendered as 422.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Outgoing mail could not be sent.
    #[error("Mail error: {0}")]
    Mail(#[from] MailError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    /// The request outlived the configured timeout.
    #[error("Request timed out")]
    Timeout,
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// 401 with the given message.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        AppError::Core(CoreError::Unauthorized(message.into()))
    }

    /// 404 for a missing record.
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        AppError::Core(CoreError::NotFound { entity, id })
    }
}

/// `{"error": [message]}`, the `errors` block of non-field failures.
fn generic(message: &str) -> Value {
    json!({ "error": [message] })
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match &self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, .. } => {
                    let msg = format!("{entity} not found");
                    (StatusCode::NOT_FOUND, msg.clone(), generic(&msg))
                }
                CoreError::DocumentNotFound(name) => {
                    tracing::debug!(file = %name, "Document not found");
                    (
                        StatusCode::NOT_FOUND,
                        "Document not found.".to_string(),
                        generic("Document not found."),
                    )
                }
                CoreError::Validation(msg) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    msg.clone(),
                    generic(msg),
                ),
                CoreError::Protected(msg) => (
                    StatusCode::BAD_REQUEST,
                    "Cannot delete".to_string(),
                    generic(msg),
                ),
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone(), generic(msg)),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, msg.clone(), generic(msg))
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone(), generic(msg)),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            AppError::Database(err) => classify_sqlx_error(err),

            AppError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Validation Error.".to_string(),
                field_errors(errors),
            ),

            AppError::Mail(err) => {
                tracing::error!(error = %err, "Mail delivery failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Mail Error".to_string(),
                    generic("The email could not be sent."),
                )
            }

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), generic(msg)),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
            AppError::Timeout => (
                StatusCode::REQUEST_TIMEOUT,
                "Request timed out".to_string(),
                generic("Request timed out"),
            ),
        };

        let body = json!({
            "status": false,
            "message": message,
            "errors": errors,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Response for a handler panic caught by `CatchPanicLayer`.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");
    AppError::InternalError(format!("Handler panicked: {detail}")).into_response()
}

/// Replace the empty 408 produced by `TimeoutLayer` with the failure
/// envelope. Handlers never answer 408 themselves.
pub async fn timeout_envelope(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        AppError::Timeout.into_response()
    } else {
        response
    }
}

fn internal() -> (StatusCode, String, Value) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        INTERNAL_MESSAGE.to_string(),
        generic(INTERNAL_MESSAGE),
    )
}

/// `{field: [message, ...]}` in field-name order.
fn field_errors(errors: &ValidationErrors) -> Value {
    let map: BTreeMap<String, Vec<String>> = errors
        .field_errors()
        .into_iter()
        .map(|(field, list)| {
            let messages = list
                .iter()
                .map(|e| match &e.message {
                    Some(m) => m.to_string(),
                    None => format!("The {field} field is invalid."),
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect();
    json!(map)
}

/// Classify a sqlx error into an HTTP status, message and errors block.
///
/// - `RowNotFound` maps to 404.
/// - Unique violations on a `uq_` constraint map to 409.
/// - Not-null and foreign-key violations map to 422.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, String, Value) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "Resource not found".to_string(),
            generic("Resource not found"),
        ),
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            match db_err.code().as_deref() {
                Some("23505") if constraint.starts_with("uq_") => {
                    let msg = format!("Duplicate value violates unique constraint: {constraint}");
                    (StatusCode::CONFLICT, msg.clone(), generic(&msg))
                }
                Some("23502") => {
                    let column = db_err
                        .try_downcast_ref::<PgDatabaseError>()
                        .and_then(|pg| pg.column())
                        .unwrap_or("unknown");
                    let msg = format!("The {column} field is required.");
                    (StatusCode::UNPROCESSABLE_ENTITY, msg.clone(), generic(&msg))
                }
                Some("23503") => {
                    let msg = format!("Referenced record does not exist: {constraint}");
                    (StatusCode::UNPROCESSABLE_ENTITY, msg.clone(), generic(&msg))
                }
                _ => {
                    tracing::error!(error = %db_err, "Database error");
                    internal()
                }
            }
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}
