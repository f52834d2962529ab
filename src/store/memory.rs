//! In-memory config store.

use super::{Collection, ConfigStore};
use crate::error::Result;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// A config store held entirely in memory. Objects have no physical location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    objects: BTreeMap<Collection, BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`MemoryStore::insert`].
    pub fn with(mut self, collection: &Collection, name: &str, content: impl Into<Vec<u8>>) -> Self {
        self.insert(collection, name, content);
        self
    }

    /// Insert or replace an object.
    pub fn insert(&mut self, collection: &Collection, name: &str, content: impl Into<Vec<u8>>) {
        self.objects
            .entry(collection.clone())
            .or_default()
            .insert(name.to_string(), content.into());
    }

    /// Remove an object; returns its previous content.
    pub fn remove(&mut self, collection: &Collection, name: &str) -> Option<Vec<u8>> {
        let objects = self.objects.get_mut(collection)?;
        let removed = objects.remove(name);
        if objects.is_empty() {
            self.objects.remove(collection);
        }
        removed
    }
}

impl ConfigStore for MemoryStore {
    fn read(&self, collection: &Collection, name: &str) -> Result<Option<Vec<u8>>> {
        Ok(self
            .objects
            .get(collection)
            .and_then(|objects| objects.get(name))
            .cloned())
    }

    fn list_names(&self, collection: &Collection) -> Result<BTreeSet<String>> {
        Ok(self
            .objects
            .get(collection)
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn list_collections(&self) -> Result<BTreeSet<Collection>> {
        let mut collections: BTreeSet<Collection> = self.objects.keys().cloned().collect();
        collections.insert(Collection::default_collection());
        Ok(collections)
    }

    fn resolve_path(&self, _collection: &Collection, _name: &str) -> Vec<PathBuf> {
        Vec::new()
    }

    fn file_extension(&self) -> &str {
        crate::config::DEFAULT_FILE_EXTENSION
    }
}
