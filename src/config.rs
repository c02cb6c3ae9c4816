//! Configuration for quilldb
//!
//! A JSON file with one required key (`data_dir`). Unknown keys are rejected.
//!
//! ```json
//! {
//!   "data_dir": "/var/lib/quilldb",
//!   "page_size": 5,
//!   "max_page_size": 100,
//!   "delete_policy": "block",
//!   "log_level": "info"
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::content::{ServiceOptions, DEFAULT_MAX_PAGE_SIZE};
use crate::observability::Severity;
use crate::pagination::DEFAULT_PAGE_SIZE;
use crate::store::DeletePolicy;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Data directory (required)
    pub data_dir: String,

    /// Page size when a request names none (default 5)
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Largest page size a request may ask for (default 100)
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,

    #[serde(default)]
    pub delete_policy: DeletePolicy,

    /// Minimum log severity (default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_max_page_size() -> usize {
    DEFAULT_MAX_PAGE_SIZE
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Config with every optional key at its default
    pub fn new(data_dir: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            delete_policy: DeletePolicy::default(),
            log_level: default_log_level(),
        }
    }

    /// Load and validate configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir.is_empty() {
            return Err(ConfigError::invalid("data_dir", "must not be empty"));
        }

        if self.page_size == 0 {
            return Err(ConfigError::invalid("page_size", "must be > 0"));
        }

        if self.max_page_size < self.page_size {
            return Err(ConfigError::invalid(
                "max_page_size",
                format!("must be >= page_size ({})", self.page_size),
            ));
        }

        if Severity::parse(&self.log_level).is_none() {
            return Err(ConfigError::invalid(
                "log_level",
                format!(
                    "'{}' is not one of trace, info, warn, error, fatal",
                    self.log_level
                ),
            ));
        }

        Ok(())
    }

    /// Get data directory as Path
    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    pub fn log_severity(&self) -> Severity {
        Severity::parse(&self.log_level).unwrap_or(Severity::Info)
    }

    pub fn service_options(&self) -> ServiceOptions {
        ServiceOptions {
            page_size: self.page_size,
            max_page_size: self.max_page_size,
            delete_policy: self.delete_policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::from_json(r#"{"data_dir": "/tmp/quill"}"#).unwrap();

        assert_eq!(config, Config::new("/tmp/quill"));
        assert_eq!(config.page_size, 5);
        assert_eq!(config.max_page_size, 100);
        assert_eq!(config.delete_policy, DeletePolicy::Block);
        assert_eq!(config.log_severity(), Severity::Info);
    }

    #[test]
    fn test_config_full() {
        let config = Config::from_json(
            r#"{"data_dir": "d", "page_size": 10, "max_page_size": 20,
                "delete_policy": "cascade", "log_level": "warn"}"#,
        )
        .unwrap();

        let options = config.service_options();
        assert_eq!(options.page_size, 10);
        assert_eq!(options.max_page_size, 20);
        assert_eq!(options.delete_policy, DeletePolicy::Cascade);
        assert_eq!(config.log_severity(), Severity::Warn);
    }

    #[test]
    fn test_config_requires_data_dir() {
        assert!(matches!(
            Config::from_json("{}"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            Config::from_json(r#"{"data_dir": ""}"#),
            Err(ConfigError::Invalid {
                field: "data_dir",
                ..
            })
        ));
    }

    #[test]
    fn test_config_rejects_unknown_keys() {
        let result = Config::from_json(r#"{"data_dir": "d", "wal_sync_mode": "fsync"}"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_config_validates_values() {
        let cases = [
            (r#"{"data_dir": "d", "page_size": 0}"#, "page_size"),
            (
                r#"{"data_dir": "d", "page_size": 10, "max_page_size": 5}"#,
                "max_page_size",
            ),
            (r#"{"data_dir": "d", "log_level": "debug"}"#, "log_level"),
        ];

        for (json, expected) in cases {
            match Config::from_json(json) {
                Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected invalid {}, got {:?}", expected, other),
            }
        }
    }

    #[test]
    fn test_config_rejects_unknown_delete_policy() {
        let result = Config::from_json(r#"{"data_dir": "d", "delete_policy": "orphan"}"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load(Path::new("/nonexistent/quilldb.json"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
