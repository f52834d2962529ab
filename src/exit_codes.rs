//! Exit code constants for the confsync CLI.
//!
//! - 0: Success (including "no changes to import")
//! - 1: User error (bad args, invalid config, aborted by the operator)
//! - 2: Store failure (unreadable or malformed config object)
//! - 3: Import failure (the importer rejected the changelist)
//! - 4: Lock failure (another import is running)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid configuration, or an aborted import.
pub const USER_ERROR: i32 = 1;

/// Store failure: a config object could not be read or parsed.
pub const STORE_FAILURE: i32 = 2;

/// Import failure: the importer reported errors while applying the changelist.
pub const IMPORT_FAILURE: i32 = 3;

/// Lock failure: another import holds the import lock.
pub const LOCK_FAILURE: i32 = 4;
