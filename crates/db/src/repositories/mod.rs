//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Multi-table writes open their own
//! transaction.

pub mod account_repo;
pub mod company_repo;
pub mod dashboard_repo;
pub mod follow_up_repo;
pub mod role_repo;
pub mod session_repo;
pub mod staff_repo;

pub use account_repo::AccountRepo;
pub use company_repo::CompanyRepo;
pub use dashboard_repo::DashboardRepo;
pub use follow_up_repo::FollowUpRepo;
pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use staff_repo::StaffRepo;
