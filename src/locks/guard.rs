//! RAII lock guard.

use std::fs;
use std::path::{Path, PathBuf};

/// Guard for a held lock file. The file is deleted on drop; a failed delete
/// is logged, never a panic.
#[derive(Debug)]
pub struct LockGuard {
    path: PathBuf,
}

impl LockGuard {
    pub(super) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            log::warn!("failed to release lock '{}': {}", self.path.display(), e);
        }
    }
}
