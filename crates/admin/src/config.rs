//! Configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `VOLTLANE_DATABASE_URL` - `PostgreSQL` connection string (falls back
//!   to the generic `DATABASE_URL`)
//!
//! ## Optional
//! - `VOLTLANE_DB_MAX_CONNECTIONS` - Pool size cap (default: 10)
//! - `VOLTLANE_DB_MIN_CONNECTIONS` - Idle connections kept warm (default: 2)
//! - `VOLTLANE_DB_ACQUIRE_TIMEOUT_SECS` - Pool acquire timeout (default: 10)

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_MIN_CONNECTIONS: u32 = 2;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin data-layer configuration.
///
/// Implements `Debug` via `SecretString`, so the connection URL (which
/// carries the database password) never reaches log output.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// Connection pool configuration
    pub pool: PoolConfig,
}

/// Connection pool sizing.
#[derive(Debug, Clone, Copy)]
pub struct PoolConfig {
    /// Maximum number of pooled connections
    pub max_connections: u32,
    /// Connections kept open when idle
    pub min_connections: u32,
    /// Seconds to wait for a free connection before failing
    pub acquire_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
        }
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("VOLTLANE_DATABASE_URL", "DATABASE_URL")?;
        let pool = PoolConfig::from_env()?;

        Ok(Self { database_url, pool })
    }
}

impl PoolConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            max_connections: parse_env_or(
                "VOLTLANE_DB_MAX_CONNECTIONS",
                DEFAULT_MAX_CONNECTIONS,
            )?,
            min_connections: parse_env_or(
                "VOLTLANE_DB_MIN_CONNECTIONS",
                DEFAULT_MIN_CONNECTIONS,
            )?,
            acquire_timeout_secs: parse_env_or(
                "VOLTLANE_DB_ACQUIRE_TIMEOUT_SECS",
                DEFAULT_ACQUIRE_TIMEOUT_SECS,
            )?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL from `primary_key`, falling back to `fallback_key`
/// (the generic variable set by managed postgres attach flows).
fn get_database_url(primary_key: &str, fallback_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var(fallback_key) {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Parse an environment variable, falling back to a default when unset.
fn parse_env_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}
