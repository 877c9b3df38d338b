//! Lookup of the seeded `roles` rows.

use backoffice_core::roles::Role;
use backoffice_core::types::DbId;
use sqlx::PgPool;

pub struct RoleRepo;

impl RoleRepo {
    /// Primary key of the row seeded for `role`.
    ///
    /// `None` means the migrations and [`Role`] have drifted apart.
    pub async fn id_of(pool: &PgPool, role: Role) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM roles WHERE name = $1")
            .bind(role.as_str())
            .fetch_optional(pool)
            .await
    }
}
