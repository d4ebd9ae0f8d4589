//! Environment-driven core configuration.
//!
//! # Responsibility
//! - Decide which repository backend a host process opens.
//! - Carry logging level and directory for `init_logging`.
//!
//! # Variables
//! - `EMPLOYEE_STORE`: `memory` (default) or `sqlite`.
//! - `EMPLOYEE_DB_PATH`: database file, required when the store is `sqlite`.
//! - `EMPLOYEE_LOG_LEVEL`: `trace|debug|info|warn|error`; defaults by build mode.
//! - `EMPLOYEE_LOG_DIR`: absolute directory for rolling logs; unset disables file logging.

use crate::logging::{default_log_level, normalize_level};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_STORE: &str = "EMPLOYEE_STORE";
pub const ENV_DB_PATH: &str = "EMPLOYEE_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "EMPLOYEE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "EMPLOYEE_LOG_DIR";

/// Storage medium behind the repository contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    #[default]
    Memory,
    Sqlite,
}

impl StoreKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Sqlite => "sqlite",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" | "in_memory" => Some(Self::Memory),
            "sqlite" => Some(Self::Sqlite),
            _ => None,
        }
    }
}

/// Backend selection.
///
/// A `Sqlite` store without `sqlite_path` uses a private in-memory database.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub kind: StoreKind,
    #[serde(default)]
    pub sqlite_path: Option<PathBuf>,
}

/// Full core configuration for a host process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreConfig {
    pub store: StoreConfig,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidStore(String),
    MissingSqlitePath,
    InvalidLogLevel(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidStore(value) => write!(
                f,
                "unsupported {ENV_STORE} `{value}`; expected memory|sqlite"
            ),
            Self::MissingSqlitePath => {
                write!(f, "{ENV_STORE}=sqlite requires {ENV_DB_PATH} to be set")
            }
            Self::InvalidLogLevel(message) => write!(f, "{message}"),
        }
    }
}

impl Error for ConfigError {}

impl CoreConfig {
    /// Loads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, treating blank values as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let kind = match get(ENV_STORE) {
            Some(value) => StoreKind::parse(&value).ok_or(ConfigError::InvalidStore(value))?,
            None => StoreKind::default(),
        };
        let sqlite_path = get(ENV_DB_PATH).map(|value| PathBuf::from(value.trim()));
        if kind == StoreKind::Sqlite && sqlite_path.is_none() {
            return Err(ConfigError::MissingSqlitePath);
        }

        let log_level = match get(ENV_LOG_LEVEL) {
            Some(value) => normalize_level(&value).map_err(ConfigError::InvalidLogLevel)?,
            None => default_log_level(),
        };
        let log_dir = get(ENV_LOG_DIR).map(|value| PathBuf::from(value.trim()));

        Ok(Self {
            store: StoreConfig { kind, sqlite_path },
            log_level: log_level.to_string(),
            log_dir,
        })
    }
}
