//! Project context resolution for confsync.
//!
//! A project is a directory holding (optionally) `confsync.yaml`, the staging
//! and active store directories, and the `.confsync/` state directory used for
//! the import lock and the audit log. Commands resolve the context once and
//! derive every path from it.

use crate::config::{CONFIG_FILE_NAME, Config, DEFAULT_SCRATCH_SUBDIR};
use crate::error::{Result, SyncError};
use std::env;
use std::path::{Path, PathBuf};

/// State directory name relative to the project root.
pub const STATE_DIR: &str = ".confsync";

/// Resolved paths for a confsync project. All paths are absolute.
#[derive(Debug, Clone)]
pub struct SyncContext {
    /// Project root.
    pub root: PathBuf,

    /// `{root}/.confsync/`
    pub state_dir: PathBuf,

    /// `{root}/.confsync/locks/`
    pub locks_dir: PathBuf,

    /// Loaded (or default) project configuration.
    pub config: Config,
}

impl SyncContext {
    /// Resolve the context from the current working directory.
    pub fn resolve() -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| {
            SyncError::UserError(format!("failed to get current working directory: {}", e))
        })?;

        Self::resolve_from(&cwd)
    }

    /// Resolve the context rooted at `root`, loading `confsync.yaml` if present.
    pub fn resolve_from<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(SyncError::UserError(format!(
                "project root '{}' is not a directory",
                root.display()
            )));
        }

        let root = root.canonicalize().map_err(|e| {
            SyncError::UserError(format!(
                "failed to resolve project root '{}': {}",
                root.display(),
                e
            ))
        })?;

        let config = Config::load_or_default(root.join(CONFIG_FILE_NAME))?;
        Ok(Self::with_config(root, config))
    }

    /// Build a context from an already-validated config.
    pub fn with_config(root: PathBuf, config: Config) -> Self {
        let state_dir = root.join(STATE_DIR);
        let locks_dir = state_dir.join("locks");
        Self {
            root,
            state_dir,
            locks_dir,
            config,
        }
    }

    /// Staging directories, most specific first.
    pub fn staging_dirs(&self) -> Vec<PathBuf> {
        self.config
            .staging_dirs
            .iter()
            .map(|d| self.absolute(d))
            .collect()
    }

    /// Active store directory.
    pub fn active_dir(&self) -> PathBuf {
        self.absolute(&self.config.active_dir)
    }

    /// Scratch area for masked artifacts.
    pub fn scratch_dir(&self) -> PathBuf {
        match &self.config.scratch_dir {
            Some(dir) => self.absolute(dir),
            None => env::temp_dir().join(DEFAULT_SCRATCH_SUBDIR),
        }
    }

    /// Path to the import lock file.
    pub fn import_lock_path(&self) -> PathBuf {
        self.locks_dir.join("import.lock")
    }

    /// Path to the audit log.
    pub fn events_file(&self) -> PathBuf {
        self.state_dir.join("events").join("events.ndjson")
    }

    fn absolute(&self, dir: &str) -> PathBuf {
        let path = Path::new(dir);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_with_defaults() {
        let temp = TempDir::new().unwrap();
        let ctx = SyncContext::resolve_from(temp.path()).unwrap();

        let root = temp.path().canonicalize().unwrap();
        assert_eq!(ctx.root, root);
        assert_eq!(ctx.staging_dirs(), vec![root.join("config/sync")]);
        assert_eq!(ctx.active_dir(), root.join("config/active"));
        assert!(ctx.import_lock_path().ends_with(".confsync/locks/import.lock"));
        assert!(ctx.events_file().ends_with("events/events.ndjson"));
    }

    #[test]
    fn test_resolve_reads_config_file() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "staging_dirs: [local, /abs/shared]\nactive_dir: live\nscratch_dir: scratch\n",
        )
        .unwrap();

        let ctx = SyncContext::resolve_from(temp.path()).unwrap();
        let root = temp.path().canonicalize().unwrap();

        assert_eq!(
            ctx.staging_dirs(),
            vec![root.join("local"), PathBuf::from("/abs/shared")]
        );
        assert_eq!(ctx.active_dir(), root.join("live"));
        assert_eq!(ctx.scratch_dir(), root.join("scratch"));
    }

    #[test]
    fn test_default_scratch_dir_is_under_temp() {
        let temp = TempDir::new().unwrap();
        let ctx = SyncContext::resolve_from(temp.path()).unwrap();

        assert_eq!(
            ctx.scratch_dir(),
            env::temp_dir().join(DEFAULT_SCRATCH_SUBDIR)
        );
    }

    #[test]
    fn test_resolve_missing_root_fails() {
        let temp = TempDir::new().unwrap();
        let result = SyncContext::resolve_from(temp.path().join("missing"));

        assert!(matches!(result, Err(SyncError::UserError(_))));
    }

    #[test]
    fn test_resolve_invalid_config_fails() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(CONFIG_FILE_NAME), "staging_dirs: []\n").unwrap();

        let result = SyncContext::resolve_from(temp.path());
        assert!(result.is_err());
    }
}
