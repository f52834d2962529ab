//! Import locking for confsync.
//!
//! Only one import may run against a project at a time. The lock is a file at
//! `.confsync/locks/import.lock`, created with **create_new** semantics so that
//! exactly one process wins. It carries JSON metadata (owner, pid, RFC3339
//! `created_at`, action) for diagnostics, and is released by an RAII guard.
//!
//! A stale lock is reported, never taken over: only `confsync lock clear`
//! removes a lock the current process does not hold.

mod guard;
mod metadata;
mod operations;


pub use guard::LockGuard;
pub(crate) use metadata::current_actor;
pub use metadata::{IMPORT_ACTION, LockMetadata};
pub use operations::{CLEAR_HINT, LockInfo, acquire_lock, clear_lock, lock_held, read_lock};
