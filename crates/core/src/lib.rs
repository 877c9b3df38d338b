//! Domain types and pure business rules for the back-office API.
//!
//! Nothing in this crate performs I/O against the database or network; the
//! `db` and `api` crates build on the types and rules defined here.

pub mod company;
pub mod error;
pub mod forms;
pub mod import;
pub mod normalize;
pub mod pagination;
pub mod roles;
pub mod search;
pub mod spreadsheet;
pub mod staff;
pub mod types;
