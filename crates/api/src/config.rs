use std::path::PathBuf;

use crate::auth::jwt::JwtConfig;

/// Default upload ceiling: five 2 MiB images plus form overhead.
const DEFAULT_MAX_BODY_BYTES: usize = 12 * 1024 * 1024;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Largest accepted request body in bytes.
    pub max_body_bytes: usize,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
    /// Admin account ensured at startup, if configured.
    pub seed_admin: Option<SeedAdmin>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `MAX_BODY_BYTES`       | `12582912`                 |
    ///
    /// # Panics
    ///
    /// Panics on unparsable values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_body_bytes: usize = std::env::var("MAX_BODY_BYTES")
            .map(|v| v.parse().expect("MAX_BODY_BYTES must be a valid usize"))
            .unwrap_or(DEFAULT_MAX_BODY_BYTES);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_body_bytes,
            jwt: JwtConfig::from_env(),
            storage: StorageConfig::from_env(),
            seed_admin: SeedAdmin::from_env(),
        }
    }
}

/// Where uploaded files and the brochure live.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root of the blob directory tree (default: `storage`).
    pub root: PathBuf,
    /// Brochure attached by send-brochure. A generated one-page PDF is
    /// used when unset.
    pub brochure_path: Option<PathBuf>,
}

impl StorageConfig {
    /// | Env Var         | Default   |
    /// |-----------------|-----------|
    /// | `STORAGE_ROOT`  | `storage` |
    /// | `BROCHURE_PATH` | unset     |
    pub fn from_env() -> Self {
        let root = std::env::var("STORAGE_ROOT").unwrap_or_else(|_| "storage".into());
        let brochure_path = std::env::var("BROCHURE_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Self {
            root: PathBuf::from(root),
            brochure_path,
        }
    }
}

/// Credentials for the bootstrap admin account.
#[derive(Debug, Clone)]
pub struct SeedAdmin {
    pub email: String,
    pub password: String,
}

impl SeedAdmin {
    /// Reads `SEED_ADMIN_EMAIL` and `SEED_ADMIN_PASSWORD`; both must be set.
    pub fn from_env() -> Option<Self> {
        let email = std::env::var("SEED_ADMIN_EMAIL").ok()?;
        let password = std::env::var("SEED_ADMIN_PASSWORD").ok()?;
        if email.trim().is_empty() || password.is_empty() {
            return None;
        }
        Some(Self {
            email: email.trim().to_string(),
            password,
        })
    }
}
