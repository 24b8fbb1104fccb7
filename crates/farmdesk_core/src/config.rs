//! Process configuration read from the environment.
//!
//! # Invariants
//! - `project_id` is non-empty and names the database file.
//! - `data_dir` is absolute.
//! - `log_level` is always set; it falls back to `default_log_level()`.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const PROJECT_ID_KEY: &str = "FARMDESK_PROJECT_ID";
pub const DATA_DIR_KEY: &str = "FARMDESK_DATA_DIR";
pub const LOG_LEVEL_KEY: &str = "FARMDESK_LOG_LEVEL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(key) => write!(f, "missing required setting {key}"),
            Self::Invalid { key, message } => write!(f, "invalid setting {key}: {message}"),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Identifies the record store; also the database file stem.
    pub project_id: String,
    pub data_dir: PathBuf,
    pub log_level: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values count as missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let project_id = read(PROJECT_ID_KEY).ok_or(ConfigError::Missing(PROJECT_ID_KEY))?;
        if !project_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ConfigError::Invalid {
                key: PROJECT_ID_KEY,
                message: format!("`{project_id}` may only contain letters, digits, '-' and '_'"),
            });
        }

        let data_dir = PathBuf::from(read(DATA_DIR_KEY).ok_or(ConfigError::Missing(DATA_DIR_KEY))?);
        if !data_dir.is_absolute() {
            return Err(ConfigError::Invalid {
                key: DATA_DIR_KEY,
                message: format!("`{}` must be an absolute path", data_dir.display()),
            });
        }

        let log_level = read(LOG_LEVEL_KEY).unwrap_or_else(|| default_log_level().to_string());

        Ok(Self {
            project_id,
            data_dir,
            log_level,
        })
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.db", self.project_id))
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError, DATA_DIR_KEY, LOG_LEVEL_KEY, PROJECT_ID_KEY};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn derives_paths_from_project_and_data_dir() {
        let config = AppConfig::from_lookup(lookup(&[
            (PROJECT_ID_KEY, "north-farm"),
            (DATA_DIR_KEY, "/var/lib/farmdesk"),
            (LOG_LEVEL_KEY, "warn"),
        ]))
        .unwrap();

        assert_eq!(
            config.database_path(),
            PathBuf::from("/var/lib/farmdesk/north-farm.db")
        );
        assert_eq!(config.log_dir(), PathBuf::from("/var/lib/farmdesk/logs"));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn blank_required_values_are_missing() {
        let err = AppConfig::from_lookup(lookup(&[
            (PROJECT_ID_KEY, "  "),
            (DATA_DIR_KEY, "/tmp"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing(PROJECT_ID_KEY));

        let err = AppConfig::from_lookup(lookup(&[(PROJECT_ID_KEY, "farm")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(DATA_DIR_KEY));
    }

    #[test]
    fn rejects_relative_data_dir_and_path_like_project_ids() {
        let err = AppConfig::from_lookup(lookup(&[
            (PROJECT_ID_KEY, "farm"),
            (DATA_DIR_KEY, "data"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key, .. } if key == DATA_DIR_KEY));

        let err = AppConfig::from_lookup(lookup(&[
            (PROJECT_ID_KEY, "../farm"),
            (DATA_DIR_KEY, "/tmp"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key, .. } if key == PROJECT_ID_KEY));
    }

    #[test]
    fn log_level_defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[
            (PROJECT_ID_KEY, "farm"),
            (DATA_DIR_KEY, "/tmp"),
        ]))
        .unwrap();
        assert_eq!(config.log_level, crate::logging::default_log_level());
    }
}
