//! Repository tests against a real database.
//!
//! - Schema bootstrap and role seeds
//! - Staff create/update/delete with owned rows
//! - Company list filtering, type taxonomy and follow-up cascade
//! - Session revocation

use assert_matches::assert_matches;
use backoffice_core::roles::Role;
use backoffice_core::search::like_pattern;
use backoffice_db::models::account::NewAccount;
use backoffice_db::models::company::CompanyInput;
use backoffice_db::models::follow_up::FollowUpInput;
use backoffice_db::models::session::CreateSession;
use backoffice_db::models::staff::{
    ImageRemoval, NewEducation, NewStaff, StaffFields, StaffUpdate,
};
use backoffice_db::repositories::{
    AccountRepo, CompanyRepo, DashboardRepo, FollowUpRepo, RoleRepo, SessionRepo, StaffRepo,
};
use chrono::{Duration, NaiveDate, Utc};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn role_id(pool: &PgPool, name: &str) -> i64 {
    let role: Role = name.parse().unwrap();
    RoleRepo::id_of(pool, role)
        .await
        .unwrap()
        .unwrap_or_else(|| panic!("role {name} should be seeded"))
}

async fn new_staff(pool: &PgPool, email: &str, staff_name: &str) -> NewStaff {
    NewStaff {
        account: NewAccount {
            name: format!("{staff_name} account"),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role_id: role_id(pool, "staff").await,
        },
        fields: StaffFields {
            staff_name: Some(staff_name.to_string()),
            employee_code: None,
            date_of_birth: NaiveDate::from_ymd_opt(1990, 4, 12),
            address: Some("12 Beach Road".into()),
            mobile: Some("9800000000".into()),
            course_ids: Some(serde_json::json!([1, 2])),
            semester_ids: None,
            subject_ids: None,
        },
        education: vec![NewEducation {
            qualification: "MSc".into(),
            college_name: "CUSAT".into(),
            board_university: "CUSAT".into(),
            passing_year: "2014".into(),
            percentage: "81".into(),
        }],
        papers: Vec::new(),
        image_filenames: vec!["a.png".into(), "b.png".into()],
    }
}

fn company(name: &str, kind: Option<&str>) -> CompanyInput {
    CompanyInput {
        company_name: Some(name.to_string()),
        type_of_company: kind.map(str::to_string),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn bootstrap_seeds_roles(pool: PgPool) {
    backoffice_db::health_check(&pool).await.unwrap();

    for role in [
        Role::Admin,
        Role::Staff,
        Role::TeachingStaff,
        Role::NonTeachingStaff,
    ] {
        assert!(RoleRepo::id_of(&pool, role).await.unwrap().is_some(), "{role}");
    }
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM roles")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 4);
}

// ---------------------------------------------------------------------------
// Staff
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn staff_create_writes_account_and_children(pool: PgPool) {
    let input = new_staff(&pool, "asha@example.com", "Asha").await;
    let staff = StaffRepo::create(&pool, &input).await.unwrap();

    assert_eq!(staff.email.as_deref(), Some("asha@example.com"));

    let profile = AccountRepo::find_profile(&pool, staff.account_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile.role, "staff");
    assert_eq!(profile.staff_id, Some(staff.id));
    assert!(profile.active);

    let detail = StaffRepo::find_detail(&pool, staff.id).await.unwrap().unwrap();
    assert_eq!(detail.images.len(), 2);
    assert_eq!(detail.education.len(), 1);
    assert_eq!(detail.staff.name.as_deref(), Some("Asha account"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn staff_update_overwrites_and_applies_image_deltas(pool: PgPool) {
    let staff = StaffRepo::create(&pool, &new_staff(&pool, "asha@example.com", "Asha").await)
        .await
        .unwrap();
    let images = StaffRepo::find_detail(&pool, staff.id)
        .await
        .unwrap()
        .unwrap()
        .images;

    let update = StaffUpdate {
        name: "Asha M".into(),
        email: "asha.m@example.com".into(),
        is_active: true,
        role_id: role_id(&pool, "teachingstaff").await,
        password_hash: None,
        fields: StaffFields {
            staff_name: Some("Asha M".into()),
            ..Default::default()
        },
        education: Some(Vec::new()),
        papers: None,
        image_removal: ImageRemoval::Ids(vec![images[0].id]),
        image_filenames: vec!["c.png".into()],
    };
    let removed = StaffRepo::update(&pool, &staff, &update).await.unwrap();
    assert_eq!(removed, vec!["a.png".to_string()]);

    let detail = StaffRepo::find_detail(&pool, staff.id).await.unwrap().unwrap();
    let names: Vec<&str> = detail.images.iter().map(|i| i.filename.as_str()).collect();
    assert_eq!(names, vec!["b.png", "c.png"]);
    assert!(detail.education.is_empty());
    assert_eq!(detail.staff.role.as_deref(), Some("teachingstaff"));
    assert_eq!(detail.staff.email.as_deref(), Some("asha.m@example.com"));
    assert_eq!(detail.staff.address, None);
    assert_eq!(detail.staff.course_ids, None);

    let account = AccountRepo::find_by_email(&pool, "asha.m@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(account.password_hash, "hash");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn staff_delete_removes_account_and_images(pool: PgPool) {
    let staff = StaffRepo::create(&pool, &new_staff(&pool, "asha@example.com", "Asha").await)
        .await
        .unwrap();

    let removed = StaffRepo::delete(&pool, staff.id).await.unwrap();
    assert_matches!(removed, Some(files) if files.len() == 2);

    assert!(StaffRepo::find_by_id(&pool, staff.id).await.unwrap().is_none());
    assert!(AccountRepo::find_by_email(&pool, "asha@example.com")
        .await
        .unwrap()
        .is_none());
    let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM staff_images WHERE staff_id = $1")
        .bind(staff.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(orphans, 0);

    assert_matches!(StaffRepo::delete(&pool, staff.id).await, Ok(None));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn staff_uniqueness_checks_exclude_self(pool: PgPool) {
    let staff = StaffRepo::create(&pool, &new_staff(&pool, "asha@example.com", "Asha").await)
        .await
        .unwrap();

    assert!(StaffRepo::staff_name_taken(&pool, "Asha", None).await.unwrap());
    assert!(!StaffRepo::staff_name_taken(&pool, "Asha", Some(staff.id)).await.unwrap());
    assert!(AccountRepo::email_taken(&pool, "asha@example.com", None).await.unwrap());
    assert!(!AccountRepo::email_taken(&pool, "asha@example.com", Some(staff.account_id))
        .await
        .unwrap());

    let duplicate = StaffRepo::create(&pool, &new_staff(&pool, "asha@example.com", "Other").await).await;
    assert_matches!(duplicate, Err(sqlx::Error::Database(e)) if e.constraint() == Some("uq_accounts_email"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn staff_list_filters_by_name_and_role(pool: PgPool) {
    for (email, name) in [("a@x.io", "Anil"), ("b@x.io", "Bina"), ("c@x.io", "Anitha")] {
        StaffRepo::create(&pool, &new_staff(&pool, email, name).await)
            .await
            .unwrap();
    }

    let pattern = like_pattern("ani");
    assert_eq!(StaffRepo::count(&pool, Some(&pattern), None).await.unwrap(), 2);
    let page = StaffRepo::list(&pool, Some(&pattern), None, 7, 0).await.unwrap();
    assert_eq!(page.len(), 2);
    assert!(page.iter().all(|s| s.staff.staff_name.as_deref().unwrap().contains("Ani")));

    assert_eq!(StaffRepo::count(&pool, None, Some("staff")).await.unwrap(), 3);
    assert_eq!(StaffRepo::count(&pool, None, Some("admin")).await.unwrap(), 0);
    assert_eq!(StaffRepo::list_all(&pool).await.unwrap().len(), 3);
}

// ---------------------------------------------------------------------------
// Companies and follow-ups
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn company_create_forces_waiting_and_resolves_other(pool: PgPool) {
    let mut input = company("Acme", Some("Other"));
    input.other_type_of_company = Some("Robotics".into());

    let created = CompanyRepo::create(&pool, &input).await.unwrap();
    assert_eq!(created.status, "waiting");
    assert_eq!(created.type_of_company.as_deref(), Some("Robotics"));
    assert_eq!(created.other_type_of_company.as_deref(), Some("Robotics"));

    assert!(CompanyRepo::set_status(&pool, created.id, "interested").await.unwrap());
    let updated = CompanyRepo::update(&pool, created.id, &company("Acme Ltd", Some("Logistics")))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, "interested");
    assert_eq!(updated.other_type_of_company, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn company_types_are_distinct_and_clearable(pool: PgPool) {
    CompanyRepo::create(&pool, &company("A", Some("Retail"))).await.unwrap();
    CompanyRepo::create(&pool, &company("B", Some("Retail"))).await.unwrap();
    CompanyRepo::create(&pool, &company("C", Some("Logistics"))).await.unwrap();
    CompanyRepo::create(&pool, &company("D", None)).await.unwrap();

    assert_eq!(CompanyRepo::list_types(&pool).await.unwrap(), vec!["Logistics", "Retail"]);
    assert_eq!(CompanyRepo::clear_type(&pool, "Retail").await.unwrap(), 2);
    assert_eq!(CompanyRepo::list_types(&pool).await.unwrap(), vec!["Logistics"]);
    assert_eq!(CompanyRepo::count(&pool, None).await.unwrap(), 4);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn follow_ups_cascade_with_company(pool: PgPool) {
    let acme = CompanyRepo::create(&pool, &company("Acme", None)).await.unwrap();
    let beta = CompanyRepo::create(&pool, &company("Beta", None)).await.unwrap();
    let today = Utc::now().date_naive();

    for (company_id, days) in [(acme.id, 3), (acme.id, 1), (beta.id, -2)] {
        FollowUpRepo::create(
            &pool,
            &FollowUpInput {
                company_id: Some(company_id),
                follow_up_date: Some(today),
                next_follow_up_date: Some(today + Duration::days(days)),
                follow_up_type: Some("Call".into()),
                remarks: None,
            },
        )
        .await
        .unwrap();
    }

    assert_eq!(FollowUpRepo::count(&pool, Some(acme.id)).await.unwrap(), 2);
    let next = FollowUpRepo::next_upcoming(&pool).await.unwrap().unwrap();
    assert_eq!(next.company_name, "Acme");
    assert_eq!(next.next_follow_up_date, Some(today + Duration::days(1)));

    let pattern = like_pattern("bet");
    assert_eq!(FollowUpRepo::count_by_company_name(&pool, Some(&pattern)).await.unwrap(), 1);

    assert!(CompanyRepo::delete(&pool, acme.id).await.unwrap());
    assert_eq!(FollowUpRepo::list_all(&pool).await.unwrap().len(), 1);

    let summary = DashboardRepo::staff_summary(&pool).await.unwrap();
    assert_eq!(summary.company_count, 1);
    assert_eq!(summary.total_staff, 0);
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn revoked_sessions_are_not_active(pool: PgPool) {
    let staff = StaffRepo::create(&pool, &new_staff(&pool, "asha@example.com", "Asha").await)
        .await
        .unwrap();

    SessionRepo::create(
        &pool,
        &CreateSession {
            account_id: staff.account_id,
            token_hash: "h1".into(),
            expires_at: Utc::now() + Duration::hours(1),
            user_agent: None,
        },
    )
    .await
    .unwrap();

    assert!(SessionRepo::find_active_by_token_hash(&pool, "h1").await.unwrap().is_some());
    assert!(SessionRepo::revoke_by_token_hash(&pool, "h1").await.unwrap());
    assert!(SessionRepo::find_active_by_token_hash(&pool, "h1").await.unwrap().is_none());
    assert!(!SessionRepo::revoke_by_token_hash(&pool, "h1").await.unwrap());
    assert_eq!(SessionRepo::cleanup_expired(&pool).await.unwrap(), 1);
}
