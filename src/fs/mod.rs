//! Filesystem helpers for confsync.
//!
//! The active store is written through atomic writes so an interrupted import
//! never leaves a half-written config object, and staged artifacts are hidden
//! and restored through moves that survive cross-device scratch areas.

pub mod atomic;
mod move_file;

pub use atomic::atomic_write;
pub use move_file::move_file;
