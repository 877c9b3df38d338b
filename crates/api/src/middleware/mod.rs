//! Request middleware and the identity extractor.
//!
//! - [`access::access_control`] -- bearer-token check plus the role table.
//! - [`auth::AuthUser`] -- the identity resolved by `access_control`.
//! - [`normalize::normalize_json_body`] -- sentinel strings to null.

pub mod access;
pub mod auth;
pub mod normalize;
