//! Config stores.
//!
//! A store holds named config objects partitioned into collections. The
//! comparer reads two stores (staged and active); the masker asks the staged
//! store where an object physically lives.
//!
//! - [`FileStore`]: directory-backed, layered over an ordered list of directories
//! - [`MemoryStore`]: in-memory, for tests and embedding

mod file;
mod memory;

#[cfg(test)]
mod tests;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::{Result, SyncError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

/// A named partition of a config store.
///
/// The default collection is the empty string. Named collections use dotted
/// names (`language.fr`) that map to nested directories (`language/fr`).
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection(String);

impl Collection {
    /// The default (unnamed) collection.
    pub fn default_collection() -> Self {
        Self(String::new())
    }

    /// A named collection.
    pub fn named(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The raw collection name (empty for the default collection).
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_default(&self) -> bool {
        self.0.is_empty()
    }

    /// Directory of this collection relative to a store directory.
    pub fn relative_dir(&self) -> PathBuf {
        self.0.split('.').filter(|s| !s.is_empty()).collect()
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_default() {
            write!(f, "default")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Abstract key-value store of config objects.
pub trait ConfigStore {
    /// Raw content of an object, or `None` if the store has no such object.
    fn read(&self, collection: &Collection, name: &str) -> Result<Option<Vec<u8>>>;

    /// Names of every object in a collection.
    fn list_names(&self, collection: &Collection) -> Result<BTreeSet<String>>;

    /// Every collection in the store. Always contains the default collection.
    fn list_collections(&self) -> Result<BTreeSet<Collection>>;

    /// Candidate directories for an object's artifact, most specific first.
    fn resolve_path(&self, collection: &Collection, name: &str) -> Vec<PathBuf>;

    /// Extension of artifact files, without the leading dot.
    fn file_extension(&self) -> &str;
}

/// Validate a config object name.
///
/// Names become file stems, so anything that could escape a store directory
/// is rejected: empty names, `.`/`..`, path separators and NUL bytes.
pub fn validate_config_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(SyncError::StoreError(
            "config object name must be non-empty".to_string(),
        ));
    }

    if name == "." || name == ".." || name.contains(['/', '\\', '\0']) {
        return Err(SyncError::StoreError(format!(
            "invalid config object name '{}': names must not contain path separators",
            name
        )));
    }

    Ok(())
}
