use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::security_headers;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/inventory";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} has invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub production: bool,
    pub cors_allowed_origins: Option<String>,
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiryConfig {
    pub interval: Duration,
    pub batch_size: i64,
    pub shutdown_grace: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub expiry: ExpiryConfig,
    pub log: LogConfig,
}

impl Config {
    /// Reads the process environment, after loading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let log_format = match get("LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "LOG_FORMAT",
                    value: other.to_string(),
                    reason: "expected 'pretty' or 'json'".to_string(),
                })
            }
        };

        let config = Self {
            database: DatabaseConfig {
                url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
                max_connections: parse(&get, "DATABASE_MAX_CONNECTIONS", 10)?,
                acquire_timeout: Duration::from_secs(parse(&get, "DATABASE_ACQUIRE_TIMEOUT_SECS", 5)?),
            },
            server: ServerConfig {
                host: parse(&get, "SERVER_HOST", IpAddr::from([0, 0, 0, 0]))?,
                port: parse(&get, "SERVER_PORT", 3001)?,
                production: get("RUST_ENV").is_some_and(|v| v.eq_ignore_ascii_case("production")),
                cors_allowed_origins: get("CORS_ALLOWED_ORIGINS"),
            },
            expiry: ExpiryConfig {
                interval: Duration::from_secs(parse(&get, "EXPIRY_INTERVAL_SECS", 60)?),
                batch_size: parse(&get, "EXPIRY_BATCH_SIZE", 500)?,
                shutdown_grace: Duration::from_secs(parse(&get, "SHUTDOWN_GRACE_SECS", 10)?),
            },
            log: LogConfig {
                level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
                format: log_format,
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database.max_connections == 0 {
            return Err(invalid("DATABASE_MAX_CONNECTIONS", "0", "must be positive"));
        }
        if self.server.port == 0 {
            return Err(invalid("SERVER_PORT", "0", "must be positive"));
        }
        if self.expiry.interval.is_zero() {
            return Err(invalid("EXPIRY_INTERVAL_SECS", "0", "must be positive"));
        }
        if !(1..=1000).contains(&self.expiry.batch_size) {
            return Err(invalid(
                "EXPIRY_BATCH_SIZE",
                &self.expiry.batch_size.to_string(),
                "must be between 1 and 1000",
            ));
        }
        Ok(())
    }
}

fn parse<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| invalid(key, &raw, &e.to_string())),
    }
}

fn invalid(key: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
