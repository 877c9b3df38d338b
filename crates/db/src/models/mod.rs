//! Row structs and write DTOs.
//!
//! Each submodule contains:
//! - `FromRow` + `Serialize` structs matching table rows or joined views
//! - write DTOs consumed by the matching repository

pub mod account;
pub mod company;
pub mod dashboard;
pub mod follow_up;
pub mod session;
pub mod staff;
