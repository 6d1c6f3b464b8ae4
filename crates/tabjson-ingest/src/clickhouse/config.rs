//! Connection settings for the ClickHouse HTTP interface.

use std::fmt;

use thiserror::Error;
use tracing::warn;

pub const HOST_VAR: &str = "CLICKHOUSE_HOST";
pub const PORT_VAR: &str = "CLICKHOUSE_PORT";
pub const USER_VAR: &str = "CLICKHOUSE_USER";
pub const PASSWORD_VAR: &str = "CLICKHOUSE_PASSWORD";
pub const DATABASE_VAR: &str = "CLICKHOUSE_DATABASE";

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8123;
pub const DEFAULT_USER: &str = "default";
pub const DEFAULT_DATABASE: &str = "default";

/// Port some deployments publish for the native protocol, and the HTTP port
/// they publish next to it.
const NATIVE_PORT: u16 = 19000;
const NATIVE_PORT_HTTP_PEER: u16 = 18123;

/// Errors resolving connection settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {key} value '{value}': expected a port number")]
    InvalidPort { key: &'static str, value: String },
}

/// ClickHouse connection settings.
///
/// Built once at the start of a run and passed into the source; nothing reads
/// the environment after that.
#[derive(Clone, PartialEq, Eq)]
pub struct ClickHouseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

impl Default for ClickHouseConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            username: DEFAULT_USER.to_string(),
            password: String::new(),
            database: DEFAULT_DATABASE.to_string(),
        }
    }
}

impl fmt::Debug for ClickHouseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClickHouseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("database", &self.database)
            .finish()
    }
}

impl ClickHouseConfig {
    /// Reads settings from the process environment, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, falling back to defaults for unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let port = match lookup(PORT_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort {
                    key: PORT_VAR,
                    value: raw,
                })?,
            None => defaults.port,
        };
        Ok(Self {
            host: lookup(HOST_VAR).unwrap_or(defaults.host),
            port,
            username: lookup(USER_VAR).unwrap_or(defaults.username),
            password: lookup(PASSWORD_VAR).unwrap_or(defaults.password),
            database: lookup(DATABASE_VAR).unwrap_or(defaults.database),
        }
        .normalized())
    }

    /// Rewrites the native-protocol port to its HTTP peer.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.port == NATIVE_PORT {
            warn!(
                from = NATIVE_PORT,
                to = NATIVE_PORT_HTTP_PEER,
                "native protocol port configured, using HTTP port instead"
            );
            self.port = NATIVE_PORT_HTTP_PEER;
        }
        self
    }

    /// Base URL of the plain-HTTP interface, without a trailing slash.
    pub fn endpoint(&self) -> String {
        let host = self.host.trim().trim_end_matches('/');
        let host = host.strip_prefix("http://").unwrap_or(host);
        format!("http://{host}:{}", self.port)
    }
}
