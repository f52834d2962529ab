//! Command implementations for confsync.
//!
//! Routes parsed CLI commands to their handlers. Every handler receives the
//! resolved [`SyncContext`].

mod import;
mod lock;
mod status;


pub use import::run_import;

use crate::cli::{Cli, Command, LockAction};
use crate::context::SyncContext;
use crate::error::Result;

/// Resolve the project context and dispatch `cli.command`.
pub fn dispatch(cli: Cli) -> Result<()> {
    let ctx = match &cli.root {
        Some(root) => SyncContext::resolve_from(root)?,
        None => SyncContext::resolve()?,
    };
    log::debug!("project root: {}", ctx.root.display());

    match cli.command {
        Command::Import(args) => import::cmd_import(&ctx, args),
        Command::Status(args) => status::cmd_status(&ctx, args),
        Command::Lock(lock_cmd) => match lock_cmd.action {
            LockAction::Clear(args) => lock::cmd_lock_clear(&ctx, args),
        },
    }
}
