//! Changelist computation.

use super::{ChangeList, ChangeOperation};
use crate::error::{Result, SyncError};
use crate::store::{Collection, ConfigStore, validate_config_name};

/// Diff capability over two config stores.
///
/// `has_changes` and `remove` have default implementations in terms of
/// [`ChangeList`]; implementors only need to provide `compute`.
pub trait ChangeListComparer {
    /// Compute the changelist that moves `active` toward `staged`.
    ///
    /// Either returns a complete changelist or an error; never a partial one.
    fn compute(&self, staged: &dyn ConfigStore, active: &dyn ConfigStore) -> Result<ChangeList>;

    fn has_changes(&self, changes: &ChangeList) -> bool {
        changes.has_changes()
    }

    /// Remove one name from one bucket. Idempotent.
    fn remove(
        &self,
        changes: ChangeList,
        collection: &Collection,
        op: ChangeOperation,
        name: &str,
    ) -> ChangeList {
        changes.without(collection, op, name)
    }
}

/// Comparer that classifies objects by parsed YAML content.
///
/// Both sides are parsed as YAML and compared structurally, so formatting
/// or key-order changes alone do not produce an update.
#[derive(Debug, Clone, Copy, Default)]
pub struct StorageComparer;

impl StorageComparer {
    pub fn new() -> Self {
        Self
    }

    fn classify(
        &self,
        staged: &dyn ConfigStore,
        active: &dyn ConfigStore,
        collection: &Collection,
        name: &str,
    ) -> Result<Option<ChangeOperation>> {
        let staged_value = read_value(staged, "staged", collection, name)?;
        let active_value = read_value(active, "active", collection, name)?;

        let op = match (staged_value, active_value) {
            (Some(_), None) => Some(ChangeOperation::Create),
            (None, Some(_)) => Some(ChangeOperation::Delete),
            (Some(s), Some(a)) if s != a => Some(ChangeOperation::Update),
            _ => None,
        };

        Ok(op)
    }
}

impl ChangeListComparer for StorageComparer {
    fn compute(&self, staged: &dyn ConfigStore, active: &dyn ConfigStore) -> Result<ChangeList> {
        let mut collections = staged.list_collections()?;
        collections.extend(active.list_collections()?);

        let mut changes = ChangeList::new();

        for collection in &collections {
            changes.ensure_collection(collection);

            let mut names = staged.list_names(collection)?;
            names.extend(active.list_names(collection)?);

            for name in &names {
                validate_config_name(name)?;

                if let Some(op) = self.classify(staged, active, collection, name)? {
                    log::trace!("{} {} in collection {}", op, name, collection);
                    changes.add(collection, op, name.as_str());
                }
            }
        }

        log::debug!(
            "computed changelist: {} change(s) across {} collection(s)",
            changes.len(),
            collections.len()
        );

        Ok(changes)
    }
}

/// Read and parse an object. A listed object that has vanished reads as absent.
fn read_value(
    store: &dyn ConfigStore,
    side: &str,
    collection: &Collection,
    name: &str,
) -> Result<Option<serde_yaml::Value>> {
    let Some(bytes) = store.read(collection, name)? else {
        return Ok(None);
    };

    serde_yaml::from_slice(&bytes).map(Some).map_err(|e| {
        SyncError::StoreError(format!(
            "{} config object '{}' in collection {} is malformed: {}",
            side, name, collection, e
        ))
    })
}
