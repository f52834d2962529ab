//! Directory-backed config store.

use super::{Collection, ConfigStore};
use crate::error::{Result, SyncError};
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A config store layered over an ordered list of directories.
///
/// The first directory is the most specific: when several directories hold the
/// same object, reads return the first one. Listing returns the union.
#[derive(Debug, Clone)]
pub struct FileStore {
    dirs: Vec<PathBuf>,
    extension: String,
}

impl FileStore {
    /// Create a layered store over `dirs` (most specific first).
    pub fn new(dirs: Vec<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dirs,
            extension: extension.into(),
        }
    }

    /// Create a store over a single directory.
    pub fn single(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self::new(vec![dir.into()], extension)
    }

    pub fn directories(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Directory of `collection` under the store directory `dir`.
    pub fn collection_dir(dir: &Path, collection: &Collection) -> PathBuf {
        dir.join(collection.relative_dir())
    }

    /// Artifact path of `name` in `collection` under the store directory `dir`.
    pub fn artifact_path(&self, dir: &Path, collection: &Collection, name: &str) -> PathBuf {
        Self::collection_dir(dir, collection).join(format!("{}.{}", name, self.extension))
    }

    /// Every artifact file across all directories and collections, including
    /// ones shadowed by a more specific directory.
    pub fn artifact_paths(&self) -> Result<Vec<PathBuf>> {
        let collections = self.list_collections()?;
        let mut paths = Vec::new();

        for dir in &self.dirs {
            for collection in &collections {
                let collection_dir = Self::collection_dir(dir, collection);
                for name in self.names_in(&collection_dir)? {
                    paths.push(self.artifact_path(dir, collection, &name));
                }
            }
        }

        Ok(paths)
    }

    /// Object names stored directly in `collection_dir`.
    fn names_in(&self, collection_dir: &Path) -> Result<BTreeSet<String>> {
        let mut names = BTreeSet::new();

        let entries = match fs::read_dir(collection_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(names),
            Err(e) => return Err(read_dir_error(collection_dir, e)),
        };

        for entry in entries {
            let entry = entry.map_err(|e| read_dir_error(collection_dir, e))?;
            let path = entry.path();

            if !path.is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(self.extension.as_str())
            {
                continue;
            }

            if let Some(stem) = path.file_stem().and_then(|s| s.to_str())
                && !stem.is_empty()
            {
                names.insert(stem.to_string());
            }
        }

        Ok(names)
    }

    /// Recursively collect collections below `dir`. `prefix` holds the dotted
    /// name of `dir` itself relative to the store directory.
    fn collect_collections(
        &self,
        dir: &Path,
        prefix: &str,
        out: &mut BTreeSet<Collection>,
    ) -> Result<()> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(read_dir_error(dir, e)),
        };

        for entry in entries {
            let entry = entry.map_err(|e| read_dir_error(dir, e))?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }

            let Some(segment) = path.file_name().and_then(|s| s.to_str()) else {
                continue;
            };
            // Hidden directories hold tool state, not collections.
            if segment.starts_with('.') {
                continue;
            }
            // Collection names use '.' as the path separator, so `a.b/` would
            // be read back as `a/b/`.
            if segment.contains('.') {
                return Err(SyncError::StoreError(format!(
                    "directory '{}' cannot hold a collection: directory names must not contain '.'",
                    path.display()
                )));
            }

            let name = if prefix.is_empty() {
                segment.to_string()
            } else {
                format!("{}.{}", prefix, segment)
            };

            if !self.names_in(&path)?.is_empty() {
                out.insert(Collection::named(name.clone()));
            }
            self.collect_collections(&path, &name, out)?;
        }

        Ok(())
    }
}

impl ConfigStore for FileStore {
    fn read(&self, collection: &Collection, name: &str) -> Result<Option<Vec<u8>>> {
        for dir in &self.dirs {
            let path = self.artifact_path(dir, collection, name);
            match fs::read(&path) {
                Ok(content) => return Ok(Some(content)),
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(SyncError::StoreError(format!(
                        "failed to read config object '{}': {}",
                        path.display(),
                        e
                    )));
                }
            }
        }

        Ok(None)
    }

    fn list_names(&self, collection: &Collection) -> Result<BTreeSet<String>> {
        let mut names = BTreeSet::new();
        for dir in &self.dirs {
            names.extend(self.names_in(&Self::collection_dir(dir, collection))?);
        }
        Ok(names)
    }

    fn list_collections(&self) -> Result<BTreeSet<Collection>> {
        let mut collections = BTreeSet::from([Collection::default_collection()]);
        for dir in &self.dirs {
            self.collect_collections(dir, "", &mut collections)?;
        }
        Ok(collections)
    }

    fn resolve_path(&self, collection: &Collection, name: &str) -> Vec<PathBuf> {
        let holding: Vec<PathBuf> = self
            .dirs
            .iter()
            .filter(|dir| self.artifact_path(dir, collection, name).is_file())
            .map(|dir| Self::collection_dir(dir, collection))
            .collect();

        if !holding.is_empty() {
            return holding;
        }

        self.dirs
            .iter()
            .map(|dir| Self::collection_dir(dir, collection))
            .collect()
    }

    fn file_extension(&self) -> &str {
        &self.extension
    }
}

fn read_dir_error(dir: &Path, e: io::Error) -> SyncError {
    SyncError::StoreError(format!(
        "failed to read store directory '{}': {}",
        dir.display(),
        e
    ))
}
