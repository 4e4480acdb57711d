//! Server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable             | Default                   |
//! |----------------------|---------------------------|
//! | `SERVER_HOST`        | `0.0.0.0`                 |
//! | `SERVER_PORT`        | `9091`                    |
//! | `STORAGE_BACKEND`    | `sqlite` (or `memory`)    |
//! | `DATABASE_PATH`      | `tablebook.db`            |
//! | `DB_MAX_CONNECTIONS` | `5`                       |
//! | `TABLE_LAYOUT`       | `1:2,2:2,3:4,4:4,5:6,6:8` |
//! | `MAX_UPLOAD_BYTES`   | `16777216` (16 MiB)       |

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;

use tablebook_core::validation::parse_table_layout;
use tablebook_core::{Table, ValidationError, DEFAULT_TABLE_LAYOUT};

/// Where table and booking state is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// SQLite file through tablebook-db.
    Sqlite,
    /// Process memory; everything is lost on restart.
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StorageBackend::Sqlite),
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            _ => Err(ConfigError::InvalidValue("STORAGE_BACKEND".to_string())),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Sqlite => f.write_str("sqlite"),
            StorageBackend::Memory => f.write_str("memory"),
        }
    }
}

/// Tablebook server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,

    /// Bind port
    pub port: u16,

    /// Storage backend
    pub storage: StorageBackend,

    /// SQLite database file (sqlite backend only)
    pub database_path: String,

    /// Connection pool size (sqlite backend only)
    pub db_max_connections: u32,

    /// `id:capacity` list seeded at startup
    pub table_layout: String,

    /// Body limit for `/bill` uploads in bytes (default: 16MB)
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let config = ServerConfig {
            host: var("SERVER_HOST", "0.0.0.0"),

            port: var("SERVER_PORT", "9091")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".to_string()))?,

            storage: var("STORAGE_BACKEND", "sqlite").parse()?,

            database_path: var("DATABASE_PATH", "tablebook.db"),

            db_max_connections: var("DB_MAX_CONNECTIONS", "5")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()))?,

            table_layout: var("TABLE_LAYOUT", DEFAULT_TABLE_LAYOUT),

            max_upload_bytes: var("MAX_UPLOAD_BYTES", "16777216")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("MAX_UPLOAD_BYTES".to_string()))?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::MissingRequired("SERVER_HOST".to_string()));
        }
        if self.storage == StorageBackend::Sqlite && self.database_path.trim().is_empty() {
            return Err(ConfigError::MissingRequired("DATABASE_PATH".to_string()));
        }
        if self.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::InvalidValue("MAX_UPLOAD_BYTES".to_string()));
        }
        self.tables()?;
        Ok(())
    }

    /// The configured table layout.
    pub fn tables(&self) -> Result<Vec<Table>, ConfigError> {
        Ok(parse_table_layout(&self.table_layout)?)
    }

    /// `host:port` to bind the listener to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Invalid TABLE_LAYOUT: {0}")]
    InvalidTableLayout(#[from] ValidationError),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:9091");
        assert_eq!(config.storage, StorageBackend::Sqlite);
        assert_eq!(config.database_path, "tablebook.db");
        assert_eq!(config.max_upload_bytes, 16 * 1024 * 1024);
        assert_eq!(config.tables().unwrap().len(), 6);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("SERVER_PORT", "8080"),
            ("STORAGE_BACKEND", "Memory"),
            ("TABLE_LAYOUT", "7:2"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.tables().unwrap(), vec![Table::new(7, 2)]);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            load(&[("SERVER_PORT", "http")]),
            Err(ConfigError::InvalidValue(name)) if name == "SERVER_PORT"
        ));
        assert!(matches!(
            load(&[("STORAGE_BACKEND", "redis")]),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            load(&[("TABLE_LAYOUT", "1:2,1:4")]),
            Err(ConfigError::InvalidTableLayout(_))
        ));
        assert!(matches!(
            load(&[("DB_MAX_CONNECTIONS", "0")]),
            Err(ConfigError::InvalidValue(_))
        ));
    }
}
