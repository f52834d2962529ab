//! File move helpers.
//!
//! Masking relocates staged artifacts into a scratch area under the system temp
//! directory, which is frequently a different filesystem (tmpfs) from the
//! project. `rename(2)` then fails with `EXDEV`, so we fall back to copying the
//! bytes with an atomic write and deleting the source.

use crate::error::{Result, SyncError};
use std::fs;
use std::io;
use std::path::Path;

/// Move a single file from `source` to `destination`.
///
/// - Creates the destination's parent directories.
/// - Tries `rename()` first.
/// - Falls back to atomic write + delete of `source` on a cross-device error.
pub fn move_file<P: AsRef<Path>, Q: AsRef<Path>>(source: P, destination: Q) -> Result<()> {
    let source = source.as_ref();
    let destination = destination.as_ref();

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            SyncError::UserError(format!(
                "failed to create destination directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(e) if is_cross_device_rename(&e) => move_across_devices(source, destination, e),
        Err(e) => Err(SyncError::UserError(format!(
            "failed to move '{}' to '{}': {}",
            source.display(),
            destination.display(),
            e
        ))),
    }
}

fn move_across_devices(source: &Path, destination: &Path, rename_error: io::Error) -> Result<()> {
    let content = fs::read(source).map_err(|e| {
        SyncError::UserError(format!(
            "failed to read '{}' for cross-device move: {} (rename error: {})",
            source.display(),
            e,
            rename_error
        ))
    })?;

    crate::fs::atomic_write(destination, &content)?;

    fs::remove_file(source).map_err(|e| {
        SyncError::UserError(format!(
            "copied '{}' across devices but failed to delete it: {}",
            source.display(),
            e
        ))
    })
}

fn is_cross_device_rename(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::CrossesDevices || err.raw_os_error() == Some(18)
}
