//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- bearer token issuance, validation and session hashing.

pub mod jwt;
pub mod password;
