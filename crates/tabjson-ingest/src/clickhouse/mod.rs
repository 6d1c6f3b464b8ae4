//! ClickHouse query source.

mod config;
mod source;

pub use config::{
    ClickHouseConfig, ConfigError, DATABASE_VAR, DEFAULT_DATABASE, DEFAULT_HOST, DEFAULT_PORT,
    DEFAULT_USER, HOST_VAR, PASSWORD_VAR, PORT_VAR, USER_VAR,
};
pub use source::ClickHouseSource;
