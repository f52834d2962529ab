//! Implementation of the `confsync import` command.
//!
//! Builds the stores, importer and masker from the project context and hands
//! them to the [`ImportCoordinator`]. The outcome of every attempt that gets
//! past comparison is appended to the audit log.

use crate::cli::ImportArgs;
use crate::context::SyncContext;
use crate::coordinator::{ImportCoordinator, ImportOutcome};
use crate::error::{Result, SyncError};
use crate::events::{Event, EventAction, append_event};
use crate::importer::DirectoryImporter;
use crate::masking::StagingMasker;
use crate::prompt::{self, Confirm};
use crate::store::FileStore;
use serde_json::json;
use std::io::{self, Write};

/// Execute the `confsync import` command.
pub fn cmd_import(ctx: &SyncContext, args: ImportArgs) -> Result<()> {
    let mut confirm = prompt::confirmer(args.yes);
    let mut stdout = io::stdout();

    run_import(ctx, confirm.as_mut(), &mut stdout)?;
    Ok(())
}

/// Run one import attempt for `ctx`.
///
/// Failure outcomes (aborted, conflict, importer errors) are returned as
/// errors; `NoChanges` and `Succeeded` are returned as values.
pub fn run_import(
    ctx: &SyncContext,
    confirm: &mut dyn Confirm,
    out: &mut dyn Write,
) -> Result<ImportOutcome> {
    let staging_dirs = ctx.staging_dirs();
    if !staging_dirs.iter().any(|d| d.is_dir()) {
        return Err(SyncError::UserError(format!(
            "no staging directory exists (looked in: {})",
            staging_dirs
                .iter()
                .map(|d| d.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )));
    }

    let extension = ctx.config.file_extension.as_str();
    let staged = FileStore::new(staging_dirs, extension);
    let active = FileStore::single(ctx.active_dir(), extension);
    let mut importer = DirectoryImporter::from_context(ctx);
    let masker = StagingMasker::new(ctx.scratch_dir());

    let outcome = ImportCoordinator::new(&staged, &active, &mut importer, masker)
        .with_directive_prefix(ctx.config.directive_prefix.as_str())
        .run(confirm, out)?;

    record_outcome(ctx, &outcome);
    outcome.into_result()
}

fn record_outcome(ctx: &SyncContext, outcome: &ImportOutcome) {
    let mut details = json!({ "outcome": outcome.label() });
    match outcome {
        ImportOutcome::Succeeded { applied } => details["applied"] = json!(applied),
        ImportOutcome::Failed { messages } => details["errors"] = json!(messages),
        _ => {}
    }

    let event = Event::new(EventAction::Import).with_details(details);
    if let Err(e) = append_event(&ctx.events_file(), &event) {
        log::warn!("failed to log import event: {}", e);
    }
}
