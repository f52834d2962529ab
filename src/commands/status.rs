//! Implementation of the `confsync status` command.
//!
//! Shows what `import` would do, without masking or touching the active store.

use crate::changelist::ChangeList;
use crate::cli::StatusArgs;
use crate::context::SyncContext;
use crate::coordinator::{self, ImportPlan, render_changes};
use crate::error::{Result, SyncError};
use crate::exclusion::ExclusionPair;
use crate::locks::{self, LockInfo};
use crate::store::FileStore;
use serde::Serialize;

#[derive(Serialize)]
struct StatusReport<'a> {
    root: String,
    changes: &'a ChangeList,
    exclusions: &'a [ExclusionPair],
    #[serde(skip_serializing_if = "Option::is_none")]
    import_lock: Option<LockReport<'a>>,
}

#[derive(Serialize)]
struct LockReport<'a> {
    owner: &'a str,
    action: &'a str,
    created_at: String,
    stale: bool,
}

/// Execute the `confsync status` command.
pub fn cmd_status(ctx: &SyncContext, args: StatusArgs) -> Result<()> {
    let extension = ctx.config.file_extension.as_str();
    let staged = FileStore::new(ctx.staging_dirs(), extension);
    let active = FileStore::single(ctx.active_dir(), extension);

    let plan = coordinator::plan(&staged, &active, &ctx.config.directive_prefix)?;
    let lock = locks::read_lock(&ctx.import_lock_path(), ctx.config.lock_stale_minutes)
        .unwrap_or_else(|e| {
            log::warn!("{}", e);
            None
        });

    if args.json {
        let report = StatusReport {
            root: ctx.root.display().to_string(),
            changes: &plan.changes,
            exclusions: &plan.exclusions,
            import_lock: lock.as_ref().map(|info| LockReport {
                owner: &info.metadata.owner,
                action: &info.metadata.action,
                created_at: info.metadata.created_at.to_rfc3339(),
                stale: info.is_stale,
            }),
        };
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| SyncError::UserError(format!("failed to serialize status: {}", e)))?;
        println!("{}", json);
        return Ok(());
    }

    print_status(&plan, &staged, lock.as_ref());
    Ok(())
}

fn print_status(plan: &ImportPlan, staged: &FileStore, lock: Option<&LockInfo>) {
    if plan.changes.has_changes() {
        println!("Pending changes ({}):", plan.changes.len());
        println!();
        print!("{}", render_changes(&plan.changes, staged));
    } else {
        println!("{}", coordinator::NO_CHANGES_MESSAGE);
    }

    if !plan.exclusions.is_empty() {
        println!();
        println!("Excluded ({}):", plan.exclusions.len());
        for pair in &plan.exclusions {
            println!(
                "  - {} -> {} [{}, {}]",
                pair.directive, pair.target, pair.collection, pair.operation
            );
        }
    }

    if let Some(info) = lock {
        println!();
        println!("Import lock: {}", info);
    }
}
