//! Library service configuration.

use std::env;

use common::{DatabaseConfig, DEFAULT_DATABASE_URL, DEFAULT_LOG_FILTER};

/// Library service configuration.
#[derive(Debug, Clone)]
pub struct LibraryServiceConfig {
    pub database: DatabaseConfig,
    /// Log filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl LibraryServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = DatabaseConfig::default();

        Self {
            database: DatabaseConfig {
                url: env::var("LIBRARY_DATABASE_URL")
                    .or_else(|_| env::var("DATABASE_URL"))
                    .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
                max_connections: parsed("LIBRARY_DB_MAX_CONNECTIONS")
                    .unwrap_or(defaults.max_connections),
                min_connections: parsed("LIBRARY_DB_MIN_CONNECTIONS")
                    .unwrap_or(defaults.min_connections),
                connect_timeout_secs: parsed("LIBRARY_DB_CONNECT_TIMEOUT_SECS")
                    .unwrap_or(defaults.connect_timeout_secs),
                sql_logging: parsed("LIBRARY_DB_SQL_LOGGING").unwrap_or(defaults.sql_logging),
            },
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Default for LibraryServiceConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

/// Parse a variable, ignoring unset or malformed values
fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_values_fall_back_to_defaults() {
        env::set_var("LIBRARY_DB_MAX_CONNECTIONS", "many");
        env::set_var("LIBRARY_DB_CONNECT_TIMEOUT_SECS", " 3 ");

        let config = LibraryServiceConfig::from_env();
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.database.connect_timeout_secs, 3);

        env::remove_var("LIBRARY_DB_MAX_CONNECTIONS");
        env::remove_var("LIBRARY_DB_CONNECT_TIMEOUT_SECS");
    }
}
