use std::sync::Arc;

use backoffice_mail::Mailer;

use crate::config::ServerConfig;
use crate::storage::BlobStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything shared lives behind `Arc` or is a pool handle.
#[derive(Clone)]
pub struct AppState {
    pub pool: backoffice_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Outgoing mail transport (SMTP, or a logging stand-in when unset).
    pub mailer: Arc<dyn Mailer>,
    /// Blob storage for uploaded files.
    pub storage: BlobStore,
}
