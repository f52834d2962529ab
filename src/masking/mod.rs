//! Reversible removal of staged artifacts.
//!
//! The importer validates the whole staged tree on its own, without regard to
//! the pruned changelist. To keep excluded objects out of that scan, their
//! files are moved into a scratch area before the import and moved back
//! afterwards.
//!
//! [`StagingMasker::mask`] returns a [`MaskGuard`]. Restoring happens in
//! [`MaskGuard::finish`] or, if that is never reached (an early return or a
//! panic), in the guard's `Drop`. Every recorded [`MovedArtifact`] gets
//! exactly one restoration attempt.


use crate::error::{Result, SyncError};
use crate::exclusion::ExclusionPair;
use crate::store::ConfigStore;
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Distinguishes sessions started by one process within the same instant.
static SESSION_SEQ: AtomicU64 = AtomicU64::new(0);

/// A relocation of one staged artifact into the scratch area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovedArtifact {
    /// Where the artifact lives in the staged store.
    pub original: PathBuf,

    /// Where it was moved to.
    pub temporary: PathBuf,

    /// Whether the move succeeded. Candidate directories that do not hold
    /// the artifact produce records with `relocated == false`.
    pub relocated: bool,
}

/// Outcome of restoring a set of moved artifacts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnmaskReport {
    /// Artifacts moved back to their original path.
    pub restored: usize,

    /// Records with nothing in the scratch area to restore.
    pub absent: usize,

    /// Artifacts still sitting in the scratch area after the attempt.
    pub stranded: Vec<MovedArtifact>,
}

impl UnmaskReport {
    pub fn is_clean(&self) -> bool {
        self.stranded.is_empty()
    }
}

/// Hides staged artifacts named by exclusion pairs.
#[derive(Debug, Clone)]
pub struct StagingMasker {
    scratch_root: PathBuf,
}

impl StagingMasker {
    /// A masker using `scratch_root` (created on demand) as its scratch area.
    pub fn new(scratch_root: impl Into<PathBuf>) -> Self {
        Self {
            scratch_root: scratch_root.into(),
        }
    }

    pub fn scratch_root(&self) -> &Path {
        &self.scratch_root
    }

    /// Move the directive and target artifacts of every pair out of `store`.
    ///
    /// Each name is tried in every candidate directory the store reports;
    /// a failed move there is expected and only logged. The only error is
    /// failing to create the scratch session directory, which happens before
    /// anything is moved.
    pub fn mask(&self, store: &dyn ConfigStore, pairs: &[ExclusionPair]) -> Result<MaskGuard> {
        let session_dir = self.create_session_dir()?;
        let extension = store.file_extension();
        let mut moved = Vec::new();
        let mut counter = 0u64;

        for pair in pairs {
            for name in pair.names() {
                for dir in store.resolve_path(&pair.collection, name) {
                    counter += 1;
                    let file_name = format!("{}.{}", name, extension);
                    let original = dir.join(&file_name);
                    let temporary = session_dir.join(format!("{}-{}", counter, file_name));

                    let relocated = match crate::fs::move_file(&original, &temporary) {
                        Ok(()) => {
                            log::debug!(
                                "masked {} -> {}",
                                original.display(),
                                temporary.display()
                            );
                            true
                        }
                        Err(e) => {
                            log::debug!("nothing masked at {}: {}", original.display(), e);
                            false
                        }
                    };

                    moved.push(MovedArtifact {
                        original,
                        temporary,
                        relocated,
                    });
                }
            }
        }

        log::info!(
            "masked {} staged artifact(s) for {} exclusion(s)",
            moved.iter().filter(|m| m.relocated).count(),
            pairs.len()
        );

        Ok(MaskGuard {
            moved,
            session_dir,
            finished: false,
        })
    }

    /// Move every artifact back to its original path.
    ///
    /// Best-effort: each record is attempted independently and nothing is
    /// returned as an error. An artifact that cannot be restored is reported
    /// at warn level and listed in [`UnmaskReport::stranded`].
    pub fn unmask(moved: &[MovedArtifact]) -> UnmaskReport {
        let mut report = UnmaskReport::default();

        for artifact in moved {
            if !artifact.temporary.exists() {
                log::debug!(
                    "nothing to restore for {}",
                    artifact.original.display()
                );
                report.absent += 1;
                continue;
            }

            // Never clobber a file that reappeared while masked.
            if artifact.original.exists() {
                log::warn!(
                    "not restoring {}: a file already exists there; the masked copy remains at {}",
                    artifact.original.display(),
                    artifact.temporary.display()
                );
                report.stranded.push(artifact.clone());
                continue;
            }

            match crate::fs::move_file(&artifact.temporary, &artifact.original) {
                Ok(()) => report.restored += 1,
                Err(e) => {
                    log::warn!(
                        "failed to restore {}: {}; the masked copy remains at {}",
                        artifact.original.display(),
                        e,
                        artifact.temporary.display()
                    );
                    report.stranded.push(artifact.clone());
                }
            }
        }

        report
    }

    fn create_session_dir(&self) -> Result<PathBuf> {
        fs::create_dir_all(&self.scratch_root).map_err(|e| {
            SyncError::UserError(format!(
                "failed to create scratch directory '{}': {}",
                self.scratch_root.display(),
                e
            ))
        })?;

        let session_dir = self.scratch_root.join(format!(
            "mask-{}-{}-{}",
            Utc::now().format("%Y%m%dT%H%M%S%6f"),
            std::process::id(),
            SESSION_SEQ.fetch_add(1, Ordering::Relaxed)
        ));

        fs::create_dir(&session_dir).map_err(|e| {
            SyncError::UserError(format!(
                "failed to create scratch session '{}': {}",
                session_dir.display(),
                e
            ))
        })?;

        Ok(session_dir)
    }
}

/// Handle for one masking session. Restores on `finish` or drop.
#[derive(Debug)]
pub struct MaskGuard {
    moved: Vec<MovedArtifact>,
    session_dir: PathBuf,
    finished: bool,
}

impl MaskGuard {
    /// Records of every relocation attempt, in order.
    pub fn moved(&self) -> &[MovedArtifact] {
        &self.moved
    }

    pub fn session_dir(&self) -> &Path {
        &self.session_dir
    }

    /// Restore every artifact and return the report.
    pub fn finish(mut self) -> UnmaskReport {
        self.restore()
    }

    fn restore(&mut self) -> UnmaskReport {
        self.finished = true;
        let report = StagingMasker::unmask(&self.moved);

        if report.is_clean() {
            // Only succeeds once the session holds nothing.
            let _ = fs::remove_dir(&self.session_dir);
        } else {
            log::warn!(
                "{} masked artifact(s) could not be restored; recover them from {}",
                report.stranded.len(),
                self.session_dir.display()
            );
        }

        report
    }
}

impl Drop for MaskGuard {
    fn drop(&mut self) {
        if !self.finished {
            self.restore();
        }
    }
}
