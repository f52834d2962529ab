//! Lock acquisition, inspection and clearing.

use super::guard::LockGuard;
use super::metadata::LockMetadata;
use crate::error::{Result, SyncError};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Shown whenever an existing lock blocks an import.
pub const CLEAR_HINT: &str = "If that import is no longer running, remove the lock with \
`confsync lock clear` (add --force if it is not stale yet).";

/// A lock file found on disk.
#[derive(Debug, Clone)]
pub struct LockInfo {
    pub path: PathBuf,
    pub metadata: LockMetadata,
    pub is_stale: bool,
    stale_after_minutes: u32,
}

impl LockInfo {
    /// See [`LockMetadata::describe`].
    pub fn describe(&self) -> String {
        self.metadata.describe(self.stale_after_minutes)
    }
}

impl std::fmt::Display for LockInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.describe())
    }
}

/// Acquire the lock at `lock_path` with exclusive-create semantics.
///
/// An existing lock file is never removed or replaced here, stale or not:
/// acquisition fails with [`SyncError::LockError`] describing the holder.
pub fn acquire_lock(
    lock_path: &Path,
    metadata: &LockMetadata,
    stale_after_minutes: u32,
) -> Result<LockGuard> {
    if let Some(parent) = lock_path.parent()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            SyncError::LockError(format!(
                "failed to create locks directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(lock_path)
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::AlreadyExists {
                busy_error(lock_path, stale_after_minutes)
            } else {
                SyncError::LockError(format!(
                    "failed to create import lock '{}': {}",
                    lock_path.display(),
                    e
                ))
            }
        })?;

    let json = metadata.to_json()?;
    if let Err(e) = file
        .write_all(json.as_bytes())
        .and_then(|()| file.sync_all())
    {
        let _ = fs::remove_file(lock_path);
        return Err(SyncError::LockError(format!(
            "failed to write import lock '{}': {}",
            lock_path.display(),
            e
        )));
    }

    log::debug!("acquired import lock {}", lock_path.display());
    Ok(LockGuard::new(lock_path.to_path_buf()))
}

fn busy_error(lock_path: &Path, stale_after_minutes: u32) -> SyncError {
    let state = match LockMetadata::load(lock_path) {
        Ok(meta) => meta.describe(stale_after_minutes),
        Err(_) => "present but unreadable".to_string(),
    };

    SyncError::LockError(format!(
        "import lock {} is {}.\n{}",
        lock_path.display(),
        state,
        CLEAR_HINT
    ))
}

/// Read the lock at `lock_path`, if any.
pub fn read_lock(lock_path: &Path, stale_after_minutes: u32) -> Result<Option<LockInfo>> {
    if !lock_path.exists() {
        return Ok(None);
    }

    let metadata = LockMetadata::load(lock_path)?;
    let is_stale = metadata.is_stale(stale_after_minutes);

    Ok(Some(LockInfo {
        path: lock_path.to_path_buf(),
        metadata,
        is_stale,
        stale_after_minutes,
    }))
}

/// Whether a live (non-stale) lock exists at `lock_path`.
///
/// An unreadable lock file counts as held: it exists, and we cannot prove
/// its owner is gone.
pub fn lock_held(lock_path: &Path, stale_after_minutes: u32) -> bool {
    match read_lock(lock_path, stale_after_minutes) {
        Ok(Some(info)) => !info.is_stale,
        Ok(None) => false,
        Err(e) => {
            log::warn!("{}", e);
            true
        }
    }
}

/// Remove the lock at `lock_path`.
///
/// A live lock is only removed with `force`. Returns the removed lock.
pub fn clear_lock(lock_path: &Path, stale_after_minutes: u32, force: bool) -> Result<LockInfo> {
    let info = read_lock(lock_path, stale_after_minutes)?.ok_or_else(|| {
        SyncError::UserError(format!("no import lock exists at {}", lock_path.display()))
    })?;

    if !info.is_stale && !force {
        return Err(SyncError::UserError(format!(
            "import lock is not stale: {}\n\nRe-run with --force to clear it anyway.",
            info
        )));
    }

    fs::remove_file(lock_path).map_err(|e| {
        SyncError::UserError(format!(
            "failed to clear import lock '{}': {}",
            lock_path.display(),
            e
        ))
    })?;

    Ok(info)
}
