//! HTTP-level tests for login, logout and the access envelope.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_staff_account, get, login, post_json, token_for, PASSWORD};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_returns_user_and_token(pool: PgPool) {
    let staff_id = create_staff_account(&pool, "asha@example.com", "staff").await;
    let app = common::build_test_app(pool);

    let response = post_json(
        &app,
        "/api/v1/login",
        None,
        json!({ "email": "asha@example.com", "password": PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], true);
    assert_eq!(json["message"], "User login successfully.");
    assert!(json["data"]["token"].is_string());
    assert_eq!(json["data"]["User"]["email"], "asha@example.com");
    assert_eq!(json["data"]["User"]["role"], "staff");
    assert_eq!(json["data"]["User"]["staff_id"], staff_id);
    assert!(json["data"]["User"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn wrong_password_is_rejected(pool: PgPool) {
    create_staff_account(&pool, "asha@example.com", "staff").await;
    let app = common::build_test_app(pool);

    let response = post_json(
        &app,
        "/api/v1/login",
        None,
        json!({ "email": "asha@example.com", "password": "not-the-password" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["status"], false);
    assert_eq!(json["message"], "Invalid Credentials.");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_email_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        &app,
        "/api/v1/login",
        None,
        json!({ "email": "nobody@example.com", "password": PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_login_body_is_a_validation_error(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        &app,
        "/api/v1/login",
        None,
        json!({ "email": "not-an-email", "password": "123" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Validation Error.");
    assert!(json["errors"]["email"].is_array());
    assert!(json["errors"]["password"].is_array());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deactivated_account_cannot_log_in(pool: PgPool) {
    create_staff_account(&pool, "gone@example.com", "staff").await;
    sqlx::query("UPDATE accounts SET is_active = false WHERE email = $1")
        .bind("gone@example.com")
        .execute(&pool)
        .await
        .unwrap();
    let app = common::build_test_app(pool);

    let response = post_json(
        &app,
        "/api/v1/login",
        None,
        json!({ "email": "gone@example.com", "password": PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn protected_routes_need_a_token(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(&app, "/api/v1/companies", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Unauthenticated.");

    let response = get(&app, "/api/v1/companies", Some("garbage.token.value")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn logout_revokes_only_the_presented_token(pool: PgPool) {
    create_staff_account(&pool, "asha@example.com", "staff").await;
    let app = common::build_test_app(pool);

    let first = login(&app, "asha@example.com", PASSWORD).await;
    let second = login(&app, "asha@example.com", PASSWORD).await;

    let response = post_json(&app, "/api/v1/logout", Some(&first), json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "User logged out successfully.");
    assert_eq!(json["data"], json!([]));

    let response = get(&app, "/api/v1/companies", Some(&first)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get(&app, "/api/v1/companies", Some(&second)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn role_table_is_enforced(pool: PgPool) {
    let app = common::build_test_app(pool);
    let lecturer = token_for(&app, "lecturer@example.com", "teachingstaff").await;
    let staff = token_for(&app, "staff@example.com", "staff").await;

    // Read-only roles can list but not write.
    let response = get(&app, "/api/v1/companies", Some(&lecturer)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(
        &app,
        "/api/v1/companies",
        Some(&lecturer),
        json!({ "company_name": "Nope Ltd" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["status"], false);

    // Staff manage companies but not staff records.
    let response = post_json(
        &app,
        "/api/v1/companies",
        Some(&staff),
        json!({ "company_name": "Yes Ltd" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(&app, "/api/v1/staff", Some(&staff), json!({})).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_is_public(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(&app, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
}
