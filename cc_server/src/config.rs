//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use credit_casino::{casino::CasinoConfig, db::DatabaseConfig};
use std::{fmt, net::SocketAddr, str::FromStr};

/// Address used when neither `--bind` nor `SERVER_BIND` is given
pub const DEFAULT_BIND: SocketAddr = SocketAddr::new(
    std::net::IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
    6969,
);

/// Where accounts are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Process memory; lost on restart
    Memory,
    /// PostgreSQL through `DATABASE_URL`
    Postgres,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            other => Err(format!("expected 'memory' or 'postgres', got '{other}'")),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Memory => write!(f, "memory"),
            StorageBackend::Postgres => write!(f, "postgres"),
        }
    }
}

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Account storage backend
    pub storage: StorageBackend,
    /// Database configuration, used with the PostgreSQL backend
    pub database: DatabaseConfig,
    /// Games, stakes, reveal pacing and promotion policy
    pub casino: CasinoConfig,
    /// Prometheus scrape address; metrics are off when unset
    pub metrics_bind: Option<SocketAddr>,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Bind address from the command line
    /// * `memory_override` - `true` when `--memory` was passed
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set but can't be parsed
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        memory_override: bool,
    ) -> Result<Self, ConfigError> {
        let bind = match bind_override {
            Some(bind) => bind,
            None => parse_env("SERVER_BIND")?.unwrap_or(DEFAULT_BIND),
        };

        let storage = if memory_override {
            StorageBackend::Memory
        } else {
            parse_env("STORAGE_BACKEND")?.unwrap_or(StorageBackend::Postgres)
        };

        let casino = CasinoConfig::from_env().map_err(|reason| ConfigError::Invalid {
            var: "PROMOTION_POLICY".to_string(),
            reason,
        })?;

        Ok(ServerConfig {
            bind,
            storage,
            database: DatabaseConfig::from_env(),
            casino,
            metrics_bind: parse_env("METRICS_BIND")?,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.casino
            .validate()
            .map_err(|reason| ConfigError::Invalid {
                var: "casino".to_string(),
                reason,
            })?;

        if self.storage == StorageBackend::Postgres {
            if self.database.database_url.is_empty() {
                return Err(ConfigError::MissingRequired {
                    var: "DATABASE_URL".to_string(),
                    hint: "Set it, or run with --memory".to_string(),
                });
            }

            if self.database.min_connections > self.database.max_connections {
                return Err(ConfigError::Invalid {
                    var: "DB_MIN_CONNECTIONS".to_string(),
                    reason: format!(
                        "Must not exceed DB_MAX_CONNECTIONS ({})",
                        self.database.max_connections
                    ),
                });
            }
        }

        if self.metrics_bind == Some(self.bind) {
            return Err(ConfigError::Invalid {
                var: "METRICS_BIND".to_string(),
                reason: "Must differ from the server bind address".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Parse an optional environment variable, failing on malformed values
fn parse_env<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.parse().map(Some).map_err(|e: T::Err| ConfigError::Invalid {
            var: key.to_string(),
            reason: e.to_string(),
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credit_casino::casino::PromotionPolicy;

    fn config() -> ServerConfig {
        ServerConfig {
            bind: "127.0.0.1:8080".parse().unwrap(),
            storage: StorageBackend::Memory,
            database: DatabaseConfig::development(),
            casino: CasinoConfig::default(),
            metrics_bind: None,
        }
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingRequired {
            var: "DATABASE_URL".to_string(),
            hint: "Use --memory".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("DATABASE_URL"));
        assert!(msg.contains("Use --memory"));
    }

    #[test]
    fn test_storage_backend_parse() {
        assert_eq!("memory".parse(), Ok(StorageBackend::Memory));
        assert_eq!("Postgres".parse(), Ok(StorageBackend::Postgres));
        assert!("sqlite".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn test_valid_config() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_config_validation_zero_cap() {
        let mut config = config();
        config.casino.promotion = PromotionPolicy::Cap { max: 0 };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_config_validation_pool_bounds() {
        let mut config = config();
        config.storage = StorageBackend::Postgres;
        config.database.min_connections = 50;
        config.database.max_connections = 5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("DB_MIN_CONNECTIONS"));
    }

    #[test]
    fn test_config_validation_metrics_port_clash() {
        let mut config = config();
        config.metrics_bind = Some(config.bind);
        assert!(config.validate().is_err());
    }
}
