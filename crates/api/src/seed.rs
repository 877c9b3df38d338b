//! Startup bootstrap of the first admin account.

use backoffice_core::roles::Role;
use backoffice_db::models::account::NewAccount;
use backoffice_db::models::staff::{NewStaff, StaffFields};
use backoffice_db::repositories::{AccountRepo, RoleRepo, StaffRepo};
use backoffice_db::DbPool;

use crate::auth::password::hash_password;
use crate::config::SeedAdmin;
use crate::error::{AppError, AppResult};

/// Create the admin account (with a linked staff record) unless an account
/// with that email already exists. Returns whether one was created.
pub async fn ensure_seed_admin(pool: &DbPool, seed: &SeedAdmin) -> AppResult<bool> {
    if AccountRepo::find_by_email(pool, &seed.email).await?.is_some() {
        tracing::debug!(email = %seed.email, "Seed admin already present");
        return Ok(false);
    }

    let role_id = RoleRepo::id_of(pool, Role::Admin)
        .await?
        .ok_or_else(|| AppError::InternalError("Admin role is missing from the roles table".into()))?;
    let password_hash = hash_password(&seed.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let staff = StaffRepo::create(
        pool,
        &NewStaff {
            account: NewAccount {
                name: "Administrator".into(),
                email: seed.email.clone(),
                password_hash,
                role_id,
            },
            fields: StaffFields {
                staff_name: Some("Administrator".into()),
                ..Default::default()
            },
            education: Vec::new(),
            papers: Vec::new(),
            image_filenames: Vec::new(),
        },
    )
    .await?;

    tracing::info!(email = %seed.email, account_id = staff.account_id, "Seed admin created");
    Ok(true)
}
