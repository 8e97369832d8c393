/*!
Configuration for the wayback-diff command line tool.

Settings are read from `<config dir>/wayback-diff/config.json`. A missing
file means defaults; `WAYBACK_DIFF_ENDPOINT` overrides the stored endpoint,
and command line flags override both.
*/

use crate::client::DEFAULT_ENDPOINT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

pub const ENDPOINT_ENV: &str = "WAYBACK_DIFF_ENDPOINT";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not find the configuration directory")]
    NoConfigDir,

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Base URL of the diff service
    pub endpoint: String,
    /// Start in the changes-only view
    pub changes_only: bool,
    /// Where reports are written when no output path is given
    pub output_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            changes_only: false,
            output_dir: None,
        }
    }
}

impl Config {
    /// Path of the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform has no configuration directory.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join("wayback-diff").join("config.json"))
    }

    /// Loads the configuration file and applies the environment override.
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self::load_from(&Self::path()?)?.with_env_override())
    }

    /// Like [`Config::load`], but an unusable file is logged and replaced by
    /// the defaults.
    pub fn load_or_default() -> Self {
        let config = match Self::path() {
            Ok(path) => Self::load_from_or_default(&path),
            Err(err) => {
                warn!(error = %err, "using default configuration");
                Self::default()
            }
        };
        config.with_env_override()
    }

    pub fn load_from_or_default(path: &Path) -> Self {
        Self::load_from(path).unwrap_or_else(|err| {
            warn!(error = %err, "configuration unusable, using defaults");
            Self::default()
        })
    }

    fn with_env_override(mut self) -> Self {
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            self.apply_endpoint_override(Some(endpoint));
        }
        self
    }

    /// Loads the configuration from `path`, falling back to defaults when
    /// the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let content = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Replaces the endpoint when `endpoint` is set and not blank.
    pub fn apply_endpoint_override(&mut self, endpoint: Option<String>) {
        if let Some(endpoint) = endpoint.filter(|e| !e.trim().is_empty()) {
            self.endpoint = endpoint.trim().to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"changes_only": true}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(config.changes_only);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            endpoint: "http://diff.internal:8080".into(),
            changes_only: true,
            output_dir: Some(dir.path().join("reports")),
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_file_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"changes_only": "yes"}"#).unwrap();
        assert_eq!(Config::load_from_or_default(&path), Config::default());

        fs::write(&path, r#"{"changes_only": true}"#).unwrap();
        assert!(Config::load_from_or_default(&path).changes_only);
    }

    #[test]
    fn test_endpoint_override() {
        let mut config = Config::default();
        config.apply_endpoint_override(Some("   ".into()));
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        config.apply_endpoint_override(Some(" http://localhost:9000 ".into()));
        assert_eq!(config.endpoint, "http://localhost:9000");
        config.apply_endpoint_override(None);
        assert_eq!(config.endpoint, "http://localhost:9000");
    }
}
