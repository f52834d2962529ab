//! Confsync: configuration import with convention-based exclusion.
//!
//! The staged store is compared against the active store to build a
//! changelist. Staged objects named `ignore.<name>` exclude themselves and
//! `<name>` from that changelist, and their files are moved aside while the
//! importer validates and applies the rest.

pub mod changelist;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod exclusion;
pub mod exit_codes;
pub mod fs;
pub mod importer;
pub mod locks;
pub mod masking;
pub mod prompt;
pub mod store;

#[cfg(test)]
mod test_support;
