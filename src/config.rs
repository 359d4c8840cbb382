use log::LevelFilter;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const ENV_FILE_VAR: &str = "ARTICLES_ENV_FILE";
const DEFAULT_ENV_FILE: &str = "config/.env";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to load env file {path}: {source}")]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind_address: String,
    pub workers: usize,
    pub read_timeout: Duration,
    pub keep_alive: Duration,
    pub shutdown_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub pool_size: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    pub level: LevelFilter,
}

/// Runtime settings, built once at startup and handed to constructors.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Seeds the environment from the env file (if present) and reads it.
    pub fn load() -> Result<Self, ConfigError> {
        let env_file = std::env::var(ENV_FILE_VAR).unwrap_or_else(|_| DEFAULT_ENV_FILE.to_string());
        load_env_file(Path::new(&env_file))?;
        Self::from_env()
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup; unset keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server = ServerConfig {
            bind_address: lookup("ARTICLES_BIND_ADDRESS")
                .unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            workers: positive(&lookup, "ARTICLES_WORKERS", 4)?,
            read_timeout: Duration::from_secs(parse(&lookup, "ARTICLES_READ_TIMEOUT_SECS", 5)?),
            keep_alive: Duration::from_secs(parse(&lookup, "ARTICLES_KEEP_ALIVE_SECS", 120)?),
            shutdown_timeout: Duration::from_secs(parse(
                &lookup,
                "ARTICLES_SHUTDOWN_TIMEOUT_SECS",
                30,
            )?),
        };
        if server.bind_address.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "ARTICLES_BIND_ADDRESS",
                reason: "must not be empty".to_string(),
            });
        }

        let database = DatabaseConfig {
            path: lookup("ARTICLES_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/articles.db")),
            pool_size: positive(&lookup, "ARTICLES_DB_POOL_SIZE", 8)?,
        };

        let logging = LoggingConfig {
            level: parse(&lookup, "ARTICLES_LOG_LEVEL", LevelFilter::Info)?,
        };

        Ok(Self {
            server,
            database,
            logging,
        })
    }
}

fn load_env_file(path: &Path) -> Result<(), ConfigError> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(()),
        Err(err) if err.not_found() => Ok(()),
        Err(source) => Err(ConfigError::EnvFile {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn parse<F, T>(lookup: &F, field: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(field) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            field,
            reason: format!("'{}': {}", raw, e),
        }),
    }
}

fn positive<F, T>(lookup: &F, field: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + PartialOrd + Default,
    T::Err: std::fmt::Display,
{
    let value = parse(lookup, field, default)?;
    if value <= T::default() {
        return Err(ConfigError::InvalidValue {
            field,
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(value)
}
