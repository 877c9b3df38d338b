pub mod auth;
pub mod company;
pub mod company_type;
pub mod dashboard;
pub mod files;
pub mod follow_up;
pub mod staff;
