#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

use backoffice_api::auth::jwt::JwtConfig;
use backoffice_api::auth::password::hash_password;
use backoffice_api::config::{ServerConfig, StorageConfig};
use backoffice_api::router::build_app_router;
use backoffice_api::state::AppState;
use backoffice_api::storage::BlobStore;
use backoffice_core::roles::Role;
use backoffice_db::models::account::NewAccount;
use backoffice_db::models::staff::{NewStaff, StaffFields};
use backoffice_db::repositories::{RoleRepo, StaffRepo};
use backoffice_mail::MemoryMailer;

pub const PASSWORD: &str = "secret123";
const BOUNDARY: &str = "backoffice-test-boundary";

/// Build a test `ServerConfig` with safe defaults and storage under `root`.
pub fn test_config(root: &std::path::Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_body_bytes: 12 * 1024 * 1024,
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            access_token_expiry_mins: 60,
        },
        storage: StorageConfig {
            root: root.to_path_buf(),
            brochure_path: None,
        },
        seed_admin: None,
    }
}

/// Router plus the handles tests inspect after a request.
pub struct TestApp {
    pub router: Router,
    pub pool: PgPool,
    pub mailer: Arc<MemoryMailer>,
    pub storage: TempDir,
}

/// Build the full application router, with the production middleware
/// stack, over `pool`.
pub fn build_test_app(pool: PgPool) -> TestApp {
    build_test_app_with_mailer(pool, MemoryMailer::new())
}

pub fn build_test_app_with_mailer(pool: PgPool, mailer: MemoryMailer) -> TestApp {
    let storage = tempfile::tempdir().expect("temp storage dir");
    let config = test_config(storage.path());
    let mailer = Arc::new(mailer);

    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        mailer: mailer.clone(),
        storage: BlobStore::new(storage.path()),
    };

    TestApp {
        router: build_app_router(state, &config),
        pool,
        mailer,
        storage,
    }
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

/// Create an account with a linked staff record. Returns the staff id.
pub async fn create_staff_account(pool: &PgPool, email: &str, role: &str) -> i64 {
    let role = role.parse::<Role>().expect("known role");
    let role_id = RoleRepo::id_of(pool, role).await.unwrap().expect("seeded role");
    let staff_name = email.split('@').next().unwrap_or(email).to_string();
    let staff = StaffRepo::create(
        pool,
        &NewStaff {
            account: NewAccount {
                name: staff_name.clone(),
                email: email.to_string(),
                password_hash: hash_password(PASSWORD).unwrap(),
                role_id,
            },
            fields: StaffFields {
                staff_name: Some(staff_name),
                ..Default::default()
            },
            education: Vec::new(),
            papers: Vec::new(),
            image_filenames: Vec::new(),
        },
    )
    .await
    .unwrap();
    staff.id
}

/// Log in through the API and return the bearer token.
pub async fn login(app: &TestApp, email: &str, password: &str) -> String {
    let response = post_json(
        app,
        "/api/v1/login",
        None,
        serde_json::json!({ "email": email, "password": password }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "login should succeed");
    let json = body_json(response).await;
    json["data"]["token"].as_str().unwrap().to_string()
}

/// Seed an account with `role` and return its token.
pub async fn token_for(app: &TestApp, email: &str, role: &str) -> String {
    create_staff_account(&app.pool, email, role).await;
    login(app, email, PASSWORD).await
}

pub async fn admin_token(app: &TestApp) -> String {
    token_for(app, "admin@example.com", "admin").await
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response) -> Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn send(app: &TestApp, request: Request<Body>) -> Response {
    app.router.clone().oneshot(request).await.unwrap()
}

fn builder(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
}

pub async fn get(app: &TestApp, uri: &str, token: Option<&str>) -> Response {
    send(app, builder(Method::GET, uri, token).body(Body::empty()).unwrap()).await
}

pub async fn json_request(
    app: &TestApp,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Value,
) -> Response {
    let request = builder(method, uri, token)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &TestApp, uri: &str, token: Option<&str>, body: Value) -> Response {
    json_request(app, Method::POST, uri, token, body).await
}

pub async fn put_json(app: &TestApp, uri: &str, token: Option<&str>, body: Value) -> Response {
    json_request(app, Method::PUT, uri, token, body).await
}

pub async fn delete(app: &TestApp, uri: &str, token: Option<&str>) -> Response {
    send(app, builder(Method::DELETE, uri, token).body(Body::empty()).unwrap()).await
}

/// Walk `path?page=1..=last_page` and join the `key` arrays in order.
///
/// Also checks every page but the last is full.
pub async fn collect_pages(app: &TestApp, token: &str, path: &str, key: &str) -> Vec<Value> {
    let mut items = Vec::new();
    let mut page = 1;
    loop {
        let response = get(app, &format!("{path}?page={page}"), Some(token)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let pagination = &json["data"]["Pagination"];
        assert_eq!(pagination["current_page"], page);
        assert_eq!(pagination["per_page"], 7);

        let rows = json["data"][key].as_array().unwrap().clone();
        let last_page = pagination["last_page"].as_i64().unwrap();
        if page < last_page {
            assert_eq!(rows.len(), 7, "page {page} of {path} should be full");
        }
        items.extend(rows);
        if page >= last_page {
            return items;
        }
        page += 1;
    }
}

/// Send an already-encoded `application/x-www-form-urlencoded` body.
pub async fn form_request(
    app: &TestApp,
    method: Method,
    uri: &str,
    token: Option<&str>,
    encoded: &str,
) -> Response {
    let request = builder(method, uri, token)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(encoded.to_string()))
        .unwrap();
    send(app, request).await
}

/// A file part of a multipart test body.
pub struct FilePart<'a> {
    pub field: &'a str,
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub bytes: &'a [u8],
}

pub fn multipart_body(fields: &[(&str, &str)], files: &[FilePart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for file in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                file.field, file.file_name, file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(file.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn multipart_request(
    app: &TestApp,
    method: Method,
    uri: &str,
    token: Option<&str>,
    fields: &[(&str, &str)],
    files: &[FilePart<'_>],
) -> Response {
    let request = builder(method, uri, token)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(fields, files)))
        .unwrap();
    send(app, request).await
}

/// Smallest byte sequence `image::guess_format` reads as PNG.
pub fn png_bytes() -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];
    bytes.extend_from_slice(&[0; 32]);
    bytes
}
