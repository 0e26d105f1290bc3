//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

use database::Database;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Maximum pooled database connections.
    pub database_pool_size: u32,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `SINAIS_ADDR` | Server bind address | `127.0.0.1:8080` |
    /// | `DATABASE_URL` | SQLite database URL | `sqlite:sinais.db?mode=rwc` |
    /// | `DATABASE_POOL_SIZE` | Max pooled connections | `20` |
    ///
    /// Provider settings for the advisory gateway are read separately by
    /// `advisory::AdvisoryConfig::from_env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("SINAIS_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:sinais.db?mode=rwc".to_string());

        let database_pool_size = match env::var("DATABASE_POOL_SIZE") {
            Ok(value) => value
                .parse()
                .ok()
                .filter(|size| *size > 0)
                .ok_or(ConfigError::InvalidPoolSize)?,
            Err(_) => Database::DEFAULT_POOL_SIZE,
        };

        Ok(Self {
            addr,
            database_url,
            database_pool_size,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid SINAIS_ADDR format")]
    InvalidAddr,

    #[error("DATABASE_POOL_SIZE must be a positive integer")]
    InvalidPoolSize,
}
