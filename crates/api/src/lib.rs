//! Back-office API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! storage, document rendering) so integration tests and the binary
//! entrypoint can both access them.

pub mod auth;
pub mod config;
pub mod documents;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod seed;
pub mod state;
pub mod storage;
