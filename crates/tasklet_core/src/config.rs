//! Runtime configuration for the widget.
//!
//! # Responsibility
//! - Resolve the data directory, log level and store namespace.
//! - Derive the database and log paths from the data directory.
//!
//! Resolution order: explicit overrides, then `TASKLET_HOME` /
//! `TASKLET_LOG_LEVEL`, then the platform data directory, then the temp dir.
//! A relative home is resolved against the working directory.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const HOME_ENV: &str = "TASKLET_HOME";
pub const LOG_LEVEL_ENV: &str = "TASKLET_LOG_LEVEL";
pub const DEFAULT_NAMESPACE: &str = "tasklet";
const APP_DIR_NAME: &str = "tasklet";
const DB_FILE_NAME: &str = "tasklet.sqlite3";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyOverride(&'static str),
    /// The home directory could not be made absolute.
    InvalidHome { path: PathBuf, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyOverride(name) => write!(f, "`{name}` must not be empty"),
            Self::InvalidHome { path, message } => {
                write!(f, "invalid home directory `{}`: {message}", path.display())
            }
        }
    }
}

impl Error for ConfigError {}

/// Values a caller may force instead of the environment defaults.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub home: Option<PathBuf>,
    pub log_level: Option<String>,
    pub namespace: Option<String>,
}

/// Resolved widget configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    /// Directory holding the settings database and logs. Always absolute.
    pub home: PathBuf,
    pub log_level: String,
    /// Partition inside the settings table.
    pub namespace: String,
}

impl WidgetConfig {
    /// Resolves configuration from overrides and the process environment.
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        Self::resolve_with(overrides, |name| std::env::var(name).ok())
    }

    /// Same as [`WidgetConfig::resolve`] with an injectable environment lookup.
    pub fn resolve_with(
        overrides: ConfigOverrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let home = match overrides.home {
            Some(path) if path.as_os_str().is_empty() => {
                return Err(ConfigError::EmptyOverride("home"));
            }
            Some(path) => path,
            None => non_blank(env(HOME_ENV))
                .map(PathBuf::from)
                .unwrap_or_else(default_home),
        };
        let home = std::path::absolute(&home).map_err(|err| ConfigError::InvalidHome {
            path: home.clone(),
            message: err.to_string(),
        })?;

        let log_level = match overrides.log_level {
            Some(level) => {
                non_blank(Some(level)).ok_or(ConfigError::EmptyOverride("log_level"))?
            }
            None => {
                non_blank(env(LOG_LEVEL_ENV)).unwrap_or_else(|| default_log_level().to_string())
            }
        };

        let namespace = match overrides.namespace {
            Some(namespace) => {
                non_blank(Some(namespace)).ok_or(ConfigError::EmptyOverride("namespace"))?
            }
            None => DEFAULT_NAMESPACE.to_string(),
        };

        Ok(Self {
            home,
            log_level,
            namespace,
        })
    }

    pub fn db_path(&self) -> PathBuf {
        self.home.join(DB_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.home.join(LOG_DIR_NAME)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

fn default_home() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}
