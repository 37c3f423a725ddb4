//! Runtime configuration.
//!
//! Resolution order: built-in defaults, then an optional TOML file named by
//! `AUTOREPLY_CONFIG`, then individual environment variables. `.env` files
//! are loaded into the environment first.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::AppError;

pub const DEFAULT_BIND: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(127, 0, 0, 1), 9430));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Sqlite,
    Memory,
}

impl StorageBackend {
    fn parse(value: &str) -> Result<Self, AppError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StorageBackend::Sqlite),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(AppError::Config(format!(
                "Invalid storage backend '{other}'. Must be one of: sqlite, memory"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Result<Self, AppError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(AppError::Config(format!(
                "Invalid log format '{other}'. Must be one of: pretty, json"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub storage: StorageBackend,
    pub data_dir: PathBuf,
    pub seed_demo: bool,
    pub log_format: LogFormat,
    pub log_dir: Option<PathBuf>,
    pub sentry_dsn: Option<String>,
}

/// Shape of the optional TOML file. Every key may be omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    bind: Option<String>,
    storage: Option<StorageBackend>,
    data_dir: Option<PathBuf>,
    seed_demo: Option<bool>,
    log_format: Option<LogFormat>,
    log_dir: Option<PathBuf>,
    sentry_dsn: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND,
            storage: StorageBackend::Sqlite,
            data_dir: default_data_dir(),
            seed_demo: false,
            log_format: LogFormat::Pretty,
            log_dir: None,
            sentry_dsn: None,
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("autoreply"))
        .unwrap_or_else(|| PathBuf::from("data"))
}

fn parse_bind(value: &str) -> Result<SocketAddr, AppError> {
    value
        .trim()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid bind address '{value}': {e}")))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(AppError::Config(format!("{key} must be a boolean, got '{other}'"))),
    }
}

impl AppConfig {
    /// Load `.env`, the optional TOML file, and environment overrides.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let file = match std::env::var("AUTOREPLY_CONFIG") {
            Ok(path) if !path.trim().is_empty() => Some(read_file_config(Path::new(path.trim()))?),
            _ => None,
        };
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    fn resolve(
        file: Option<FileConfig>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let mut config = AppConfig::default();

        if let Some(file) = file {
            if let Some(bind) = file.bind {
                config.bind_addr = parse_bind(&bind)?;
            }
            if let Some(storage) = file.storage {
                config.storage = storage;
            }
            if let Some(dir) = file.data_dir {
                config.data_dir = dir;
            }
            if let Some(seed) = file.seed_demo {
                config.seed_demo = seed;
            }
            if let Some(format) = file.log_format {
                config.log_format = format;
            }
            config.log_dir = file.log_dir.or(config.log_dir);
            config.sentry_dsn = file.sentry_dsn.or(config.sentry_dsn);
        }

        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        if let Some(bind) = env("AUTOREPLY_BIND") {
            config.bind_addr = parse_bind(&bind)?;
        }
        if let Some(storage) = env("AUTOREPLY_STORAGE") {
            config.storage = StorageBackend::parse(&storage)?;
        }
        if let Some(dir) = env("AUTOREPLY_DATA_DIR") {
            config.data_dir = PathBuf::from(dir.trim());
        }
        if let Some(seed) = env("AUTOREPLY_SEED_DEMO") {
            config.seed_demo = parse_bool("AUTOREPLY_SEED_DEMO", &seed)?;
        }
        if let Some(format) = env("AUTOREPLY_LOG_FORMAT") {
            config.log_format = LogFormat::parse(&format)?;
        }
        if let Some(dir) = env("AUTOREPLY_LOG_DIR") {
            config.log_dir = Some(PathBuf::from(dir.trim()));
        }
        if let Some(dsn) = env("SENTRY_DSN") {
            config.sentry_dsn = Some(dsn.trim().to_string());
        }

        Ok(config)
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, AppError> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| AppError::Config(format!("Failed to parse {}: {e}", path.display())))
}
