//! Typed HTTP client for the back-office API.
//!
//! Mirrors the data-fetch hooks the web front end is built on: a cached,
//! retrying read wrapper ([`Query`]) and a notifying write wrapper
//! ([`Mutation`]) over one shared [`ApiClient`].

pub mod cache;
pub mod client;
pub mod error;
pub mod hooks;
pub mod notify;
pub mod resources;
pub mod state;

pub use cache::{CacheKey, QueryCache, STALE_TIME};
pub use client::{ApiClient, Envelope};
pub use error::ClientError;
pub use hooks::{Mutation, MutationOptions, Query, QueryOptions};
pub use notify::{MemoryNotifier, Notice, Notifier, TracingNotifier};
pub use state::FetchState;
