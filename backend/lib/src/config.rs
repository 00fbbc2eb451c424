use std::{io::IsTerminal, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use crate::constants::{
    database::{
        DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_DATABASE_URL, DEFAULT_IDLE_TIMEOUT_SECS,
        DEFAULT_MAX_CONNECTIONS, DEFAULT_MAX_LIFETIME_SECS, DEFAULT_MIN_IDLE_CONNECTIONS,
    },
    pagination::{
        DEFAULT_PAGE_LIMIT, DEFAULT_QUERY_TIMEOUT_SECS, MAX_PAGE_LIMIT, PAGE_LIMIT_CEILING,
    },
    server::{DEFAULT_HOST, DEFAULT_PORT},
};
use crate::data::market_db::repository::pool::PoolSettings;
use crate::pagination::PageLimits;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub log_format: LogFormat,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[cfg(feature = "mocks")]
    #[serde(default)]
    pub mock_mode: bool,
    #[serde(default)]
    pub pool: PoolConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub max_connections: u32,
    /// Idle connections kept open; `None` lets the pool shrink to zero
    pub min_idle: Option<u32>,
    /// Wait for a free connection before the request fails
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: Option<u64>,
    pub max_lifetime_secs: Option<u64>,
    /// Connect through rustls (`MARKET_DB_TLS_CA_FILE` or the platform roots)
    pub tls: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_idle: Some(DEFAULT_MIN_IDLE_CONNECTIONS),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            idle_timeout_secs: Some(DEFAULT_IDLE_TIMEOUT_SECS),
            max_lifetime_secs: Some(DEFAULT_MAX_LIFETIME_SECS),
            tls: true,
        }
    }
}

impl PoolConfig {
    pub fn settings(&self) -> PoolSettings {
        PoolSettings {
            max_size: self.max_connections,
            min_idle: self.min_idle,
            connection_timeout: Duration::from_secs(self.connect_timeout_secs),
            idle_timeout: self.idle_timeout_secs.map(Duration::from_secs),
            max_lifetime: self.max_lifetime_secs.map(Duration::from_secs),
            tls: self.tls,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Page size used when a request does not specify `limit`
    pub default_limit: i64,
    /// Largest accepted `limit`
    pub max_limit: i64,
    /// Deadline for a single page query; `None` waits indefinitely
    pub query_timeout_secs: Option<u64>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_PAGE_LIMIT,
            max_limit: MAX_PAGE_LIMIT,
            query_timeout_secs: Some(DEFAULT_QUERY_TIMEOUT_SECS),
        }
    }
}

impl PaginationConfig {
    pub fn page_limits(&self) -> PageLimits {
        PageLimits {
            max_limit: self.max_limit,
            query_timeout: self.query_timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Output format of the logs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON when stdout is not a terminal, text otherwise
    #[default]
    Auto,
    /// Bunyan JSON lines
    Json,
    /// Human readable
    Text,
}

impl LogFormat {
    /// Turn `Auto` into a concrete format by looking at stdout.
    pub fn resolve(self) -> Self {
        match self {
            LogFormat::Auto if std::io::stdout().is_terminal() => LogFormat::Text,
            LogFormat::Auto => LogFormat::Json,
            other => other,
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(LogFormat::Auto),
            "json" => Ok(LogFormat::Json),
            "text" => Ok(LogFormat::Text),
            other => Err(format!("unknown log format `{other}`, expected auto|json|text")),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        // these are just some sane defaults, most likely we will
        // have them overridden
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_format: LogFormat::Auto,
            database: DatabaseConfig {
                url: DEFAULT_DATABASE_URL.to_string(),
                #[cfg(feature = "mocks")]
                mock_mode: true,
                pool: PoolConfig::default(),
            },
            pagination: PaginationConfig::default(),
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> std::io::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> std::io::Result<Self> {
        toml::from_str(contents)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Check settings that cannot be expressed through types alone.
    pub fn validate(&self) -> crate::error::Result<()> {
        let pagination = &self.pagination;
        if pagination.max_limit < 1 || pagination.max_limit > PAGE_LIMIT_CEILING {
            return Err(crate::error::Error::Config(format!(
                "pagination.max_limit must be between 1 and {PAGE_LIMIT_CEILING}"
            )));
        }
        if pagination.default_limit < 1 || pagination.default_limit > pagination.max_limit {
            return Err(crate::error::Error::Config(format!(
                "pagination.default_limit must be between 1 and {}",
                pagination.max_limit
            )));
        }
        if pagination.query_timeout_secs == Some(0) {
            return Err(crate::error::Error::Config(
                "pagination.query_timeout_secs must be positive".to_string(),
            ));
        }

        let pool = &self.database.pool;
        if pool.max_connections == 0 {
            return Err(crate::error::Error::Config(
                "database.pool.max_connections must be at least 1".to_string(),
            ));
        }
        if pool.min_idle.is_some_and(|idle| idle > pool.max_connections) {
            return Err(crate::error::Error::Config(
                "database.pool.min_idle must not exceed max_connections".to_string(),
            ));
        }
        if pool.connect_timeout_secs == 0 {
            return Err(crate::error::Error::Config(
                "database.pool.connect_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
