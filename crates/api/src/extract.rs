//! Request body extractors.
//!
//! - [`AppJson`] -- `axum::Json` whose rejection renders the error envelope.
//! - [`FormPayload`] -- a body that may be JSON, urlencoded or
//!   `multipart/form-data`, deserialized into one typed struct with
//!   uploaded files kept aside.

use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::{BytesRejection, FormRejection, JsonRejection};
use axum::extract::{Form, FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use backoffice_core::error::CoreError;
use backoffice_core::normalize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::AppError;

/// JSON body extractor with envelope-shaped rejections.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Core(CoreError::Validation(rejection.body_text()))
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        AppError::Core(CoreError::Validation(rejection.body_text()))
    }
}

impl From<BytesRejection> for AppError {
    fn from(rejection: BytesRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// A file part of a multipart body.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Form field name with any `[]` suffix removed.
    pub field: String,
    pub file_name: String,
    pub bytes: Bytes,
}

/// Typed form body plus uploaded files.
///
/// Multipart text fields and urlencoded pairs are collected into a JSON
/// object before deserializing: `key[]` (and repeated keys) become arrays,
/// and sentinel strings become null. JSON bodies are used as-is; an empty
/// body reads as `{}`.
#[derive(Debug)]
pub struct FormPayload<T> {
    pub data: T,
    pub files: Vec<UploadedFile>,
}

impl<T> FormPayload<T> {
    /// Files uploaded under `field`, in upload order.
    pub fn files_named<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a UploadedFile> + 'a {
        self.files.iter().filter(move |f| f.field == field)
    }
}

impl<S, T> FromRequest<S> for FormPayload<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let (value, files) = if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state).await?;
            read_multipart(multipart).await?
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state).await?;
            (read_pairs(pairs), Vec::new())
        } else {
            let bytes = Bytes::from_request(req, state).await?;
            (read_json(&bytes)?, Vec::new())
        };

        let data = serde_json::from_value(value)
            .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

        Ok(FormPayload { data, files })
    }
}

fn read_json(bytes: &[u8]) -> Result<Value, AppError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    let mut value: Value = serde_json::from_slice(bytes)
        .map_err(|e| AppError::Core(CoreError::Validation(format!("Invalid JSON body: {e}"))))?;
    normalize::object_fields(&mut value);
    Ok(value)
}

fn read_pairs(pairs: Vec<(String, String)>) -> Value {
    let mut fields = Map::new();
    for (raw_name, text) in pairs {
        let (name, is_list) = field_key(&raw_name);
        if !name.is_empty() {
            insert_text(&mut fields, name, is_list, text);
        }
    }
    Value::Object(fields)
}

async fn read_multipart(mut multipart: Multipart) -> Result<(Value, Vec<UploadedFile>), AppError> {
    let mut fields = Map::new();
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let raw_name = field.name().unwrap_or("").to_string();
        let (name, is_list) = field_key(&raw_name);
        if name.is_empty() {
            continue;
        }

        if let Some(file_name) = field.file_name().map(str::to_string) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            // Browsers send an empty part for an untouched file input.
            if file_name.is_empty() && bytes.is_empty() {
                continue;
            }
            files.push(UploadedFile {
                field: name.to_string(),
                file_name,
                bytes,
            });
            continue;
        }

        let text = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        insert_text(&mut fields, name, is_list, text);
    }

    Ok((Value::Object(fields), files))
}

/// Split `images[]` / `course_id[0]` into the bare key and a list flag.
fn field_key(raw: &str) -> (&str, bool) {
    match raw.find('[') {
        Some(pos) if raw.ends_with(']') => (&raw[..pos], true),
        _ => (raw, false),
    }
}

fn insert_text(fields: &mut Map<String, Value>, name: &str, is_list: bool, text: String) {
    let value = if normalize::is_null_sentinel(&text) {
        Value::Null
    } else {
        Value::String(text)
    };

    match fields.get_mut(name) {
        Some(Value::Array(items)) => {
            if !value.is_null() {
                items.push(value);
            }
        }
        Some(existing) if is_list => {
            let mut items = Vec::new();
            if !existing.is_null() {
                items.push(existing.take());
            }
            if !value.is_null() {
                items.push(value);
            }
            *existing = Value::Array(items);
        }
        Some(existing) => *existing = value,
        None if is_list => {
            let items = if value.is_null() { Vec::new() } else { vec![value] };
            fields.insert(name.to_string(), Value::Array(items));
        }
        None => {
            fields.insert(name.to_string(), value);
        }
    }
}
