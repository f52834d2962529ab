//! The downstream importer that applies a changelist to the active store.
//!
//! The coordinator only relies on the [`Importer`] contract. [`DirectoryImporter`]
//! is the bundled implementation for file-backed projects.

mod directory;


pub use directory::DirectoryImporter;

use crate::changelist::ChangeList;
use crate::error::SyncError;
use thiserror::Error;

/// Failure reported by [`Importer::apply`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("import failed with {} error(s)", .messages.len())]
pub struct ImportError {
    pub messages: Vec<String>,
}

impl ImportError {
    pub fn new(messages: Vec<String>) -> Self {
        Self { messages }
    }
}

impl From<ImportError> for SyncError {
    fn from(err: ImportError) -> Self {
        SyncError::ImportError(err.messages)
    }
}

/// Applies changelists to an active store.
pub trait Importer {
    /// Whether another import currently holds the import lock.
    fn already_importing(&self) -> bool;

    /// Apply every change in `changes`. On failure nothing is guaranteed
    /// about partial application; the messages are also kept in [`errors`].
    ///
    /// [`errors`]: Importer::errors
    fn apply(&mut self, changes: &ChangeList) -> Result<(), ImportError>;

    /// Messages from the last failed `apply`.
    fn errors(&self) -> &[String];
}
