//! Rewrites sentinel strings in JSON request bodies to null.
//!
//! Multipart bodies are normalized field by field in
//! [`FormPayload`](crate::extract::FormPayload).

use axum::body::Body;
use axum::extract::Request;
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use backoffice_core::normalize;
use serde_json::Value;

use crate::error::AppError;

fn is_json(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.to_ascii_lowercase().starts_with("application/json"))
}

/// Replace top-level `"null"`, `""` and `"undefined"` string fields of a
/// JSON object body with `null`. Other bodies pass through untouched, as do
/// JSON bodies that fail to parse (the handler's extractor reports those).
pub async fn normalize_json_body(request: Request, next: Next) -> Result<Response, AppError> {
    if !is_json(&request) {
        return Ok(next.run(request).await);
    }

    let (mut parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read request body: {e}")))?;

    let rewritten = match serde_json::from_slice::<Value>(&bytes) {
        Ok(mut value) => {
            if normalize::object_fields(&mut value) > 0 {
                Some(
                    serde_json::to_vec(&value)
                        .map_err(|e| AppError::InternalError(e.to_string()))?,
                )
            } else {
                None
            }
        }
        Err(_) => None,
    };

    let body = match rewritten {
        Some(new_bytes) => {
            parts
                .headers
                .insert(CONTENT_LENGTH, HeaderValue::from(new_bytes.len()));
            Body::from(new_bytes)
        }
        None => Body::from(bytes),
    };

    Ok(next.run(Request::from_parts(parts, body)).await)
}
