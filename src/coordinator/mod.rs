//! Import orchestration.
//!
//! ```text
//! Comparing -> NoChanges
//!           -> Confirming -> Aborted
//!                         -> Masking -> Importing -> Unmasking -> Succeeded | Failed
//!                                    -> Unmasking -> Conflict
//! ```
//!
//! The coordinator owns no state of its own beyond the collaborators it is
//! handed. Staged artifacts are restored on every path that masked them,
//! including early returns through `?`, via [`MaskGuard`](crate::masking::MaskGuard).

mod display;

#[cfg(test)]
mod tests;

pub use display::render_changes;

use crate::changelist::{ChangeList, ChangeListComparer, StorageComparer};
use crate::config::DEFAULT_DIRECTIVE_PREFIX;
use crate::error::{Result, SyncError};
use crate::exclusion::{ExclusionPair, ExclusionResolver};
use crate::importer::Importer;
use crate::masking::StagingMasker;
use crate::prompt::Confirm;
use crate::store::ConfigStore;
use serde::Serialize;
use std::fmt;
use std::io::Write;

pub const NO_CHANGES_MESSAGE: &str = "There are no changes to import.";
pub const CONFIRM_PROMPT: &str = "Import the listed configuration changes?";
pub const CONFLICT_MESSAGE: &str = "Another request may be synchronizing configuration already.";
pub const SUCCESS_MESSAGE: &str = "The configuration was imported successfully.";

/// Phases of one import attempt, logged at debug level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportPhase {
    Comparing,
    Confirming,
    Masking,
    Importing,
    Unmasking,
}

impl fmt::Display for ImportPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImportPhase::Comparing => "comparing",
            ImportPhase::Confirming => "confirming",
            ImportPhase::Masking => "masking",
            ImportPhase::Importing => "importing",
            ImportPhase::Unmasking => "unmasking",
        };
        write!(f, "{}", name)
    }
}

/// Terminal state of an import attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    NoChanges,
    Aborted,
    Conflict,
    Succeeded { applied: usize },
    Failed { messages: Vec<String> },
}

impl ImportOutcome {
    /// Map failure outcomes onto [`SyncError`].
    pub fn into_result(self) -> Result<Self> {
        match self {
            ImportOutcome::Aborted => Err(SyncError::Aborted),
            ImportOutcome::Conflict => Err(SyncError::ConflictError(CONFLICT_MESSAGE.to_string())),
            ImportOutcome::Failed { messages } => Err(SyncError::ImportError(messages)),
            other => Ok(other),
        }
    }

    /// Short label used in the audit log.
    pub fn label(&self) -> &'static str {
        match self {
            ImportOutcome::NoChanges => "no_changes",
            ImportOutcome::Aborted => "aborted",
            ImportOutcome::Conflict => "conflict",
            ImportOutcome::Succeeded { .. } => "succeeded",
            ImportOutcome::Failed { .. } => "failed",
        }
    }
}

/// The pruned changelist and the exclusions that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct ImportPlan {
    pub changes: ChangeList,
    pub exclusions: Vec<ExclusionPair>,
}

/// Runs one import attempt against injected collaborators.
pub struct ImportCoordinator<'a> {
    staged: &'a dyn ConfigStore,
    active: &'a dyn ConfigStore,
    importer: &'a mut dyn Importer,
    masker: StagingMasker,
    comparer: StorageComparer,
    directive_prefix: String,
}

impl<'a> ImportCoordinator<'a> {
    pub fn new(
        staged: &'a dyn ConfigStore,
        active: &'a dyn ConfigStore,
        importer: &'a mut dyn Importer,
        masker: StagingMasker,
    ) -> Self {
        Self {
            staged,
            active,
            importer,
            masker,
            comparer: StorageComparer::new(),
            directive_prefix: DEFAULT_DIRECTIVE_PREFIX.to_string(),
        }
    }

    pub fn with_directive_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.directive_prefix = prefix.into();
        self
    }

    /// Compute the pruned changelist without touching anything.
    pub fn plan(&self) -> Result<ImportPlan> {
        plan_with(&self.comparer, self.staged, self.active, &self.directive_prefix)
    }

    /// Run the import: compare, confirm, mask, apply, unmask.
    ///
    /// Operator-facing text (the change table, "no changes", success) goes to
    /// `out`. Failure outcomes are returned as values; use
    /// [`ImportOutcome::into_result`] to turn them into errors.
    pub fn run(&mut self, confirm: &mut dyn Confirm, out: &mut dyn Write) -> Result<ImportOutcome> {
        enter(ImportPhase::Comparing);
        let plan = self.plan()?;

        if !self.comparer.has_changes(&plan.changes) {
            writeln_out(out, NO_CHANGES_MESSAGE)?;
            return Ok(ImportOutcome::NoChanges);
        }

        write_out(out, &render_changes(&plan.changes, self.staged))?;

        enter(ImportPhase::Confirming);
        if !confirm.confirm(CONFIRM_PROMPT)? {
            return Ok(ImportOutcome::Aborted);
        }

        enter(ImportPhase::Masking);
        let guard = self.masker.mask(self.staged, &plan.exclusions)?;

        if self.importer.already_importing() {
            enter(ImportPhase::Unmasking);
            guard.finish();
            return Ok(ImportOutcome::Conflict);
        }

        enter(ImportPhase::Importing);
        let result = self.importer.apply(&plan.changes);

        enter(ImportPhase::Unmasking);
        guard.finish();

        match result {
            Ok(()) => {
                writeln_out(out, SUCCESS_MESSAGE)?;
                Ok(ImportOutcome::Succeeded {
                    applied: plan.changes.len(),
                })
            }
            Err(e) => Ok(ImportOutcome::Failed {
                messages: e.messages,
            }),
        }
    }
}

/// Compare `staged` against `active` and resolve exclusion directives.
pub fn plan(
    staged: &dyn ConfigStore,
    active: &dyn ConfigStore,
    directive_prefix: &str,
) -> Result<ImportPlan> {
    plan_with(&StorageComparer::new(), staged, active, directive_prefix)
}

fn plan_with<C: ChangeListComparer>(
    comparer: &C,
    staged: &dyn ConfigStore,
    active: &dyn ConfigStore,
    directive_prefix: &str,
) -> Result<ImportPlan> {
    let raw = comparer.compute(staged, active)?;
    let (changes, exclusions) = ExclusionResolver::new(comparer, directive_prefix).resolve(raw);

    Ok(ImportPlan {
        changes,
        exclusions,
    })
}

fn enter(phase: ImportPhase) {
    log::debug!("import phase: {}", phase);
}

fn write_out(out: &mut dyn Write, text: &str) -> Result<()> {
    out.write_all(text.as_bytes())
        .map_err(|e| SyncError::UserError(format!("failed to write output: {}", e)))
}

fn writeln_out(out: &mut dyn Write, line: &str) -> Result<()> {
    write_out(out, &format!("{}\n", line))
}
