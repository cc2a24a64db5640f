//! Tracker configuration.
//!
//! Configuration is plain JSON. Every field has a default, so an empty
//! object is a valid configuration.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::job::domain::{RetentionPolicy, StaffName};

/// Errors returned while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// File that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The content is not valid configuration JSON.
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is syntactically valid but unusable.
    #[error("invalid config: {0}")]
    Validation(String),
}

/// Settings for the job tracking services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct TrackerConfig {
    /// Days a trashed job stays listed and restorable.
    pub retention_days: u32,
    /// Purge expired trash records while listing the trash.
    pub purge_expired_on_read: bool,
    /// Attribution used for transitions without a human actor.
    pub system_actor: String,
    /// Ordered default staff names.
    pub staff_names: Vec<String>,
    /// Reject transitions attributed to names missing from the directory.
    pub enforce_staff_directory: bool,
    /// Seconds a product lookup stays cached. Zero disables caching.
    pub product_cache_ttl_secs: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            retention_days: RetentionPolicy::DEFAULT_DAYS,
            purge_expired_on_read: true,
            system_actor: "system".to_owned(),
            staff_names: vec!["홍길동".to_owned(), "김철수".to_owned(), "이영희".to_owned()],
            enforce_staff_directory: false,
            product_cache_ttl_secs: 300,
        }
    }
}

impl TrackerConfig {
    /// Loads and validates configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, parsed or
    /// validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = path.as_ref();
        let content = std::fs::read_to_string(file).map_err(|source| ConfigError::ReadFile {
            path: file.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Parses and validates configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values serde cannot check.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for a zero retention window, a
    /// blank system actor or a blank staff name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retention_days == 0 {
            return Err(ConfigError::Validation(
                "retentionDays must be at least 1".to_owned(),
            ));
        }
        StaffName::new(self.system_actor.as_str())
            .map_err(|_| ConfigError::Validation("systemActor must not be blank".to_owned()))?;
        if self.staff_names.iter().any(|name| name.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "staffNames must not contain blank names".to_owned(),
            ));
        }
        Ok(())
    }

    /// Returns the configured trash retention policy.
    #[must_use]
    pub fn retention(&self) -> RetentionPolicy {
        RetentionPolicy::days(self.retention_days)
    }

    /// Returns the attribution for system-originated transitions.
    ///
    /// Falls back to `"system"` if the configured value is blank.
    #[must_use]
    pub fn system_staff_name(&self) -> StaffName {
        StaffName::new(self.system_actor.as_str()).unwrap_or_else(|_| StaffName::system())
    }

    /// Returns the product cache lifetime.
    #[must_use]
    pub fn product_cache_ttl(&self) -> TimeDelta {
        TimeDelta::seconds(i64::from(self.product_cache_ttl_secs))
    }
}
