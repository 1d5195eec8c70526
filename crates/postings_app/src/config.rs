//! Environment-sourced settings. Validated before any network activity.
use std::path::PathBuf;

use postings_engine::{validate_table_name, DEFAULT_TABLE};
use sqlx::postgres::PgConnectOptions;

const DB_USER: &str = "DB_USER";
const DB_PASSWORD: &str = "DB_PASSWORD";
const DB_HOST: &str = "DB_HOST";
const DB_PORT: &str = "DB_PORT";
const DB_NAME: &str = "DB_NAME";
const TABLE: &str = "POSTINGS_TABLE";
const LOG_FILE: &str = "POSTINGS_LOG_FILE";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("database connection parameters are incomplete, missing: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    #[error("{DB_PORT} is not a valid port: {0:?}")]
    InvalidPort(String),
    #[error("{TABLE} is not a plain table name: {0:?}")]
    InvalidTable(String),
}

#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub name: String,
}

// Keeps the password out of logs.
impl std::fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbConfig")
            .field("user", &self.user)
            .field("password", &"***")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .finish()
    }
}

impl DbConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db: DbConfig,
    pub table: String,
    pub log_file: Option<PathBuf>,
}

impl Settings {
    /// Reads `.env` (when present) and the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key| lookup(key).filter(|value| !value.trim().is_empty());

        let mut missing = Vec::new();
        let mut require = |key: &'static str| {
            let value = read(key);
            if value.is_none() {
                missing.push(key);
            }
            value.unwrap_or_default()
        };
        let user = require(DB_USER);
        let password = require(DB_PASSWORD);
        let host = require(DB_HOST);
        let port = require(DB_PORT);
        let name = require(DB_NAME);
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort(port.clone()))?;

        let table = read(TABLE).unwrap_or_else(|| DEFAULT_TABLE.to_string());
        validate_table_name(&table).map_err(|_| ConfigError::InvalidTable(table.clone()))?;

        Ok(Self {
            db: DbConfig {
                user,
                password,
                host: host.trim().to_string(),
                port,
                name,
            },
            table,
            log_file: read(LOG_FILE).map(PathBuf::from),
        })
    }
}
