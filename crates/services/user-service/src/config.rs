//! User service configuration.

use std::env;

use common::DatabaseConfig;

/// Default log filter when RUST_LOG is not set
const DEFAULT_LOG_FILTER: &str = "info";

/// User service configuration.
#[derive(Debug, Clone)]
pub struct UserServiceConfig {
    /// Database connection settings
    pub database: DatabaseConfig,
    /// Tracing filter directive
    pub log_filter: String,
}

impl UserServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is read first, if present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = DatabaseConfig::default();

        Self {
            database: DatabaseConfig {
                url: env::var("USER_SERVICE_DATABASE_URL")
                    .or_else(|_| env::var("DATABASE_URL"))
                    .unwrap_or(defaults.url),
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.max_connections),
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.min_connections),
            },
            log_filter: env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()),
        }
    }
}

impl Default for UserServiceConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}
