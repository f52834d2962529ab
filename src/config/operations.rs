//! Config loading and validation.

use super::model::Config;
use crate::error::{Result, SyncError};
use std::path::Path;

impl Config {
    /// Load config from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            SyncError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load config from `path` if it exists, otherwise return validated defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            log::debug!("no config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Parse config from a YAML string.
    ///
    /// Unknown fields are silently ignored for forward compatibility. An empty
    /// document yields the defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = if yaml.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(yaml)
                .map_err(|e| SyncError::UserError(format!("failed to parse config YAML: {}", e)))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to a YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| SyncError::UserError(format!("failed to serialize config: {}", e)))
    }

    /// Validate config values.
    ///
    /// Rules:
    /// - at least one non-empty staging directory
    /// - `active_dir` must be non-empty
    /// - `file_extension` must be non-empty without a leading dot
    /// - `directive_prefix` must be non-empty
    /// - `lock_stale_minutes` must be positive
    pub fn validate(&self) -> Result<()> {
        if self.staging_dirs.is_empty() || self.staging_dirs.iter().any(|d| d.trim().is_empty())
        {
            return Err(invalid("staging_dirs must list at least one non-empty directory"));
        }

        if self.active_dir.trim().is_empty() {
            return Err(invalid("active_dir must be non-empty"));
        }

        if self.file_extension.is_empty() {
            return Err(invalid("file_extension must be non-empty"));
        }
        if self.file_extension.starts_with('.') {
            return Err(SyncError::UserError(format!(
                "config validation failed: file_extension must not have a leading dot (found '{}'). Use '{}' instead.",
                self.file_extension,
                self.file_extension.trim_start_matches('.')
            )));
        }

        if self.directive_prefix.is_empty() {
            return Err(invalid("directive_prefix must be non-empty"));
        }

        if self.lock_stale_minutes == 0 {
            return Err(invalid("lock_stale_minutes must be greater than 0"));
        }

        Ok(())
    }
}

fn invalid(reason: &str) -> SyncError {
    SyncError::UserError(format!("config validation failed: {}", reason))
}
