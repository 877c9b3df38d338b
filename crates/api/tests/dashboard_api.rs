//! HTTP-level tests for the dashboard aggregate.

mod common;

use axum::http::StatusCode;
use backoffice_api::auth::password::hash_password;
use backoffice_core::roles::Role;
use backoffice_db::models::account::NewAccount;
use backoffice_db::repositories::{AccountRepo, RoleRepo};
use chrono::{Duration, Utc};
use common::{admin_token, body_json, get, login, post_json, token_for, PASSWORD};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn create_company(app: &common::TestApp, token: &str, name: &str) -> i64 {
    let response = post_json(
        app,
        "/api/v1/companies",
        Some(token),
        json!({ "company_name": name }),
    )
    .await;
    body_json(response).await["data"]["Company"]["id"]
        .as_i64()
        .unwrap()
}

async fn follow_up(app: &common::TestApp, token: &str, company_id: i64, next_in_days: i64) {
    let next = (Utc::now().date_naive() + Duration::days(next_in_days)).to_string();
    let response = post_json(
        app,
        "/api/v1/followup",
        Some(token),
        json!({ "company_id": company_id, "next_follow_up_date": next }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn totals_and_next_upcoming(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = admin_token(&app).await;
    token_for(&app, "a@example.com", "staff").await;
    token_for(&app, "b@example.com", "teachingstaff").await;

    let acme = create_company(&app, &token, "Acme").await;
    let globex = create_company(&app, &token, "Globex").await;
    follow_up(&app, &token, acme, -3).await;
    follow_up(&app, &token, globex, 9).await;
    follow_up(&app, &token, acme, 2).await;

    let response = get(&app, "/api/v1/dashboard", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Dashboard data retrieved successfully");

    let data = &json["data"];
    assert_eq!(data["staff_summary"]["total_staff"], 3);
    assert_eq!(data["staff_summary"]["company_count"], 2);

    let expected = (Utc::now().date_naive() + Duration::days(2)).to_string();
    assert_eq!(data["next_upcoming_follow_up"]["company_name"], "Acme");
    assert_eq!(
        data["next_upcoming_follow_up"]["next_follow_up_date"],
        Value::String(expected)
    );
    assert_eq!(data["follow_ups"]["Pagination"]["total"], 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn follow_ups_filter_by_company_name(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = admin_token(&app).await;
    let acme = create_company(&app, &token, "Acme Logistics").await;
    let globex = create_company(&app, &token, "Globex").await;
    follow_up(&app, &token, acme, 1).await;
    follow_up(&app, &token, globex, 1).await;

    let response = get(&app, "/api/v1/dashboard?company_name=logis", Some(&token)).await;
    let json = body_json(response).await;
    let rows = json["data"]["follow_ups"]["Followup"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["company_name"], "Acme Logistics");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn nothing_upcoming_is_null(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = admin_token(&app).await;
    let acme = create_company(&app, &token, "Acme").await;
    follow_up(&app, &token, acme, -1).await;

    let response = get(&app, "/api/v1/dashboard", Some(&token)).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["next_upcoming_follow_up"], Value::Null);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn account_without_staff_record_is_refused(pool: PgPool) {
    let role_id = RoleRepo::id_of(&pool, Role::Admin).await.unwrap().unwrap();
    AccountRepo::create(
        &pool,
        &NewAccount {
            name: "Bare".into(),
            email: "bare@example.com".into(),
            password_hash: hash_password(PASSWORD).unwrap(),
            role_id,
        },
    )
    .await
    .unwrap();

    let app = common::build_test_app(pool);
    let token = login(&app, "bare@example.com", PASSWORD).await;

    let response = get(&app, "/api/v1/dashboard", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["message"],
        "User or staff details not found. Unable to load dashboard data."
    );
}
