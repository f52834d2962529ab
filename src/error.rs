//! Error types for confsync.
//!
//! Uses thiserror for derive macros and provides operator-facing messages.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for confsync operations.
///
/// Each variant maps to a specific exit code.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Invalid arguments, invalid configuration, or an unusable project layout.
    #[error("{0}")]
    UserError(String),

    /// A config object could not be read or parsed. Raised before any
    /// filesystem mutation takes place.
    #[error("Store error: {0}")]
    StoreError(String),

    /// Another import is already running.
    #[error("{0}")]
    ConflictError(String),

    /// The importer rejected the changelist.
    #[error("The import failed due to the following reasons:\n{}", .0.join("\n"))]
    ImportError(Vec<String>),

    /// Lock file could not be acquired or managed.
    #[error("Lock acquisition failed: {0}")]
    LockError(String),

    /// The operator declined the confirmation prompt.
    #[error("Aborted!")]
    Aborted,
}

impl SyncError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            SyncError::UserError(_) => exit_codes::USER_ERROR,
            SyncError::Aborted => exit_codes::USER_ERROR,
            SyncError::StoreError(_) => exit_codes::STORE_FAILURE,
            SyncError::ImportError(_) => exit_codes::IMPORT_FAILURE,
            SyncError::ConflictError(_) => exit_codes::LOCK_FAILURE,
            SyncError::LockError(_) => exit_codes::LOCK_FAILURE,
        }
    }
}

/// Result type alias for confsync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
