//! Changelists: the per-collection set of operations that moves the active
//! store toward the staged store.
//!
//! A [`ChangeList`] maps each compared collection to its three operation
//! buckets. Buckets are ordered sets, so iteration (and therefore rendering
//! and testing) is deterministic regardless of store enumeration order.

mod comparer;


pub use comparer::{ChangeListComparer, StorageComparer};

use crate::store::Collection;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Operation applied to a single config object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeOperation {
    /// Present in staged, absent in active.
    Create,
    /// Present in both with different content.
    Update,
    /// Present in active, absent in staged.
    Delete,
}

impl ChangeOperation {
    /// All operations in display order.
    pub const ALL: [ChangeOperation; 3] = [Self::Create, Self::Update, Self::Delete];
}

impl fmt::Display for ChangeOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeOperation::Create => write!(f, "create"),
            ChangeOperation::Update => write!(f, "update"),
            ChangeOperation::Delete => write!(f, "delete"),
        }
    }
}

type Buckets = BTreeMap<ChangeOperation, BTreeSet<String>>;

/// Collection → operation → names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeList {
    collections: BTreeMap<Collection, Buckets>,
}

impl ChangeList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collection with three empty buckets.
    pub fn ensure_collection(&mut self, collection: &Collection) {
        let buckets = self.collections.entry(collection.clone()).or_default();
        for op in ChangeOperation::ALL {
            buckets.entry(op).or_default();
        }
    }

    /// Add a name to a bucket, registering the collection if needed.
    pub fn add(&mut self, collection: &Collection, op: ChangeOperation, name: impl Into<String>) {
        self.ensure_collection(collection);
        if let Some(bucket) = self
            .collections
            .get_mut(collection)
            .and_then(|buckets| buckets.get_mut(&op))
        {
            bucket.insert(name.into());
        }
    }

    /// Remove a name from one bucket. Removing an absent name is a no-op.
    ///
    /// Returns whether the name was present.
    pub fn remove(&mut self, collection: &Collection, op: ChangeOperation, name: &str) -> bool {
        self.collections
            .get_mut(collection)
            .and_then(|buckets| buckets.get_mut(&op))
            .is_some_and(|bucket| bucket.remove(name))
    }

    /// Owned form of [`ChangeList::remove`].
    pub fn without(mut self, collection: &Collection, op: ChangeOperation, name: &str) -> Self {
        self.remove(collection, op, name);
        self
    }

    /// True iff at least one bucket of one collection is non-empty.
    pub fn has_changes(&self) -> bool {
        self.collections
            .values()
            .flat_map(|buckets| buckets.values())
            .any(|bucket| !bucket.is_empty())
    }

    /// Compared collections, in order.
    pub fn collections(&self) -> impl Iterator<Item = &Collection> {
        self.collections.keys()
    }

    /// Names in one bucket, sorted.
    pub fn names(&self, collection: &Collection, op: ChangeOperation) -> Vec<&str> {
        self.collections
            .get(collection)
            .and_then(|buckets| buckets.get(&op))
            .map(|bucket| bucket.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Whether `name` appears in any bucket of `collection`.
    pub fn contains(&self, collection: &Collection, name: &str) -> bool {
        self.collections
            .get(collection)
            .is_some_and(|buckets| buckets.values().any(|bucket| bucket.contains(name)))
    }

    /// Every `(collection, operation, name)` triple in deterministic order.
    pub fn rows(&self) -> impl Iterator<Item = (&Collection, ChangeOperation, &str)> {
        self.collections.iter().flat_map(|(collection, buckets)| {
            buckets.iter().flat_map(move |(op, names)| {
                names.iter().map(move |name| (collection, *op, name.as_str()))
            })
        })
    }

    /// Number of names across all buckets.
    pub fn len(&self) -> usize {
        self.collections
            .values()
            .flat_map(|buckets| buckets.values())
            .map(BTreeSet::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_changes()
    }
}
