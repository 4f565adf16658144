//! Service configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Parsing itself works over an arbitrary
//! key lookup so it can be exercised without touching the process
//! environment.

use std::net::{Ipv4Addr, SocketAddr};

use crate::error::StartupError;

/// Origins allowed to call the API when `CORS_ALLOWED_ORIGINS` is unset.
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = [
    "http://localhost:3000",
    "https://sop-frontend-one.vercel.app",
];

/// Port used when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 8080;

/// Top-level service configuration.
///
/// Loaded once at startup via [`AppConfig::from_env`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Socket address to bind the HTTP server to (`0.0.0.0:<PORT>`).
    pub listen_addr: SocketAddr,

    /// Store connection settings.
    pub database: DatabaseConfig,

    /// Origins allowed to make credentialed cross-origin requests.
    pub cors_allowed_origins: Vec<String>,
}

/// Connection pool settings for the PostgreSQL store.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string. Empty when `DATABASE_URL` is unset.
    pub url: String,

    /// Maximum number of database connections in the pool.
    pub max_connections: u32,

    /// Minimum idle connections in the pool.
    pub min_connections: u32,

    /// Timeout in seconds for acquiring a database connection.
    pub connect_timeout_secs: u64,
}

impl DatabaseConfig {
    /// Settings for the given URL with default pool sizing.
    #[must_use]
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 0,
            connect_timeout_secs: 5,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` first to optionally load a `.env`
    /// file.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::InvalidConfig`] if `PORT` is set but is not a
    /// valid port number.
    pub fn from_env() -> Result<Self, StartupError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::InvalidConfig`] if `PORT` is set but is not a
    /// valid port number.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StartupError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT").filter(|v| !v.is_empty()) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| {
                StartupError::InvalidConfig(format!("PORT must be a port number, got {raw:?}: {e}"))
            })?,
            None => DEFAULT_PORT,
        };
        let listen_addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));

        let defaults = DatabaseConfig::with_url(lookup("DATABASE_URL").unwrap_or_default());
        let database = DatabaseConfig {
            max_connections: parse_or(
                &lookup,
                "DATABASE_MAX_CONNECTIONS",
                defaults.max_connections,
            ),
            min_connections: parse_or(
                &lookup,
                "DATABASE_MIN_CONNECTIONS",
                defaults.min_connections,
            ),
            connect_timeout_secs: parse_or(
                &lookup,
                "DATABASE_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout_secs,
            ),
            ..defaults
        };

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|raw| split_origins(&raw))
            .filter(|origins| !origins.is_empty())
            .unwrap_or_else(|| {
                DEFAULT_ALLOWED_ORIGINS
                    .into_iter()
                    .map(String::from)
                    .collect()
            });

        Ok(Self {
            listen_addr,
            database,
            cors_allowed_origins,
        })
    }
}

/// Parses `key` as `T`, returning `default` on missing or invalid values.
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
