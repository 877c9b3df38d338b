//! Success envelope shared by every handler.
//!
//! All API responses use `{ "status": true, "message": ..., "data": ... }`.
//! Failures go through [`crate::error::AppError`], which renders the same
//! shape with `status: false`.

use axum::Json;
use serde::Serialize;
use serde_json::Value;

/// Standard success envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: bool,
    pub message: String,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            status: true,
            message: message.into(),
            data,
        })
    }
}

impl ApiResponse<Value> {
    /// Success with an empty `data` list, as returned by deletes.
    pub fn empty(message: impl Into<String>) -> Json<Self> {
        Self::ok(message, Value::Array(Vec::new()))
    }
}
