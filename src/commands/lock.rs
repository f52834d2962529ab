//! Implementation of the `confsync lock clear` command.

use crate::cli::LockClearArgs;
use crate::context::SyncContext;
use crate::error::Result;
use crate::events::{Event, EventAction, append_event};
use crate::locks;
use serde_json::json;

/// Execute the `confsync lock clear` command.
///
/// Removes the import lock if it is stale, or unconditionally with `--force`.
pub fn cmd_lock_clear(ctx: &SyncContext, args: LockClearArgs) -> Result<()> {
    let cleared = locks::clear_lock(
        &ctx.import_lock_path(),
        ctx.config.lock_stale_minutes,
        args.force,
    )?;

    let event = Event::new(EventAction::LockClear).with_details(json!({
        "held_minutes": cleared.metadata.minutes_held(),
        "was_stale": cleared.is_stale,
        "force": args.force,
        "owner": cleared.metadata.owner,
        "original_action": cleared.metadata.action
    }));

    // Best-effort: the lock is already gone.
    if let Err(e) = append_event(&ctx.events_file(), &event) {
        log::warn!("failed to log lock_clear event: {}", e);
    }

    println!("Cleared import lock {}.", cleared.path.display());
    println!("  It was {}.", cleared.describe());

    Ok(())
}
