//! File-backed importer.

use super::{ImportError, Importer};
use crate::changelist::{ChangeList, ChangeOperation};
use crate::context::SyncContext;
use crate::fs::atomic_write;
use crate::locks::{self, LockMetadata};
use crate::store::{Collection, ConfigStore, FileStore};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Copies staged objects into the active directory under the import lock.
///
/// Before touching the active directory it validates the whole staged tree,
/// regardless of what the changelist names: every artifact in every staging
/// directory must parse as a YAML mapping.
#[derive(Debug)]
pub struct DirectoryImporter {
    staged: FileStore,
    active_dir: PathBuf,
    lock_path: PathBuf,
    lock_stale_minutes: u32,
    errors: Vec<String>,
}

impl DirectoryImporter {
    pub fn new(
        staged: FileStore,
        active_dir: impl Into<PathBuf>,
        lock_path: impl Into<PathBuf>,
        lock_stale_minutes: u32,
    ) -> Self {
        Self {
            staged,
            active_dir: active_dir.into(),
            lock_path: lock_path.into(),
            lock_stale_minutes,
            errors: Vec::new(),
        }
    }

    /// Importer for the project described by `ctx`.
    pub fn from_context(ctx: &SyncContext) -> Self {
        Self::new(
            FileStore::new(ctx.staging_dirs(), ctx.config.file_extension.clone()),
            ctx.active_dir(),
            ctx.import_lock_path(),
            ctx.config.lock_stale_minutes,
        )
    }

    /// Validate every staged artifact. Returns one message per problem.
    fn validate_staged(&self) -> Vec<String> {
        let paths = match self.staged.artifact_paths() {
            Ok(paths) => paths,
            Err(e) => return vec![e.to_string()],
        };

        let mut messages = Vec::new();
        for path in paths {
            if let Err(msg) = validate_artifact(&path) {
                messages.push(msg);
            }
        }
        messages
    }

    fn active_path(&self, collection: &Collection, name: &str) -> PathBuf {
        self.staged.artifact_path(&self.active_dir, collection, name)
    }

    fn apply_one(
        &self,
        collection: &Collection,
        op: ChangeOperation,
        name: &str,
    ) -> Result<(), String> {
        let target = self.active_path(collection, name);

        match op {
            ChangeOperation::Create | ChangeOperation::Update => {
                let content = self
                    .staged
                    .read(collection, name)
                    .map_err(|e| format!("{}: {}", name, e))?
                    .ok_or_else(|| {
                        format!("{}: not found in staging (collection {})", name, collection)
                    })?;
                atomic_write(&target, &content).map_err(|e| format!("{}: {}", name, e))
            }
            ChangeOperation::Delete => match fs::remove_file(&target) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(format!(
                    "{}: failed to delete '{}': {}",
                    name,
                    target.display(),
                    e
                )),
            },
        }
    }

    fn fail(&mut self, messages: Vec<String>) -> Result<(), ImportError> {
        self.errors = messages.clone();
        Err(ImportError::new(messages))
    }
}

impl Importer for DirectoryImporter {
    fn already_importing(&self) -> bool {
        locks::lock_held(&self.lock_path, self.lock_stale_minutes)
    }

    fn apply(&mut self, changes: &ChangeList) -> Result<(), ImportError> {
        self.errors.clear();

        // An existing lock is never removed here, stale or not; only
        // `confsync lock clear` removes it.
        let acquired = locks::acquire_lock(
            &self.lock_path,
            &LockMetadata::for_import(),
            self.lock_stale_minutes,
        );
        let _guard = match acquired {
            Ok(guard) => guard,
            Err(e) => return self.fail(vec![e.to_string()]),
        };

        let invalid = self.validate_staged();
        if !invalid.is_empty() {
            log::debug!("staged tree failed validation with {} error(s)", invalid.len());
            return self.fail(invalid);
        }

        let mut messages = Vec::new();
        for (collection, op, name) in changes.rows() {
            match self.apply_one(collection, op, name) {
                Ok(()) => log::debug!("{} {} in collection {}", op, name, collection),
                Err(msg) => messages.push(msg),
            }
        }

        if messages.is_empty() {
            Ok(())
        } else {
            self.fail(messages)
        }
    }

    fn errors(&self) -> &[String] {
        &self.errors
    }
}

fn validate_artifact(path: &Path) -> Result<(), String> {
    let content =
        fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    let value: serde_yaml::Value = serde_yaml::from_str(&content)
        .map_err(|e| format!("{}: invalid YAML: {}", path.display(), e))?;

    if value.is_mapping() {
        Ok(())
    } else {
        Err(format!("{}: expected a mapping at the top level", path.display()))
    }
}
