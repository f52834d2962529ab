//! Tests for the import coordinator, using fake collaborators.

use super::*;
use crate::changelist::ChangeOperation;
use crate::importer::ImportError;
use crate::store::{Collection, FileStore, MemoryStore};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[derive(Default)]
struct FakeImporter {
    busy: bool,
    failure: Option<Vec<String>>,
    applied: Vec<ChangeList>,
    /// Path whose existence is recorded at apply time.
    watched: Option<PathBuf>,
    watched_seen: Option<bool>,
    errors: Vec<String>,
}

impl Importer for FakeImporter {
    fn already_importing(&self) -> bool {
        self.busy
    }

    fn apply(&mut self, changes: &ChangeList) -> std::result::Result<(), ImportError> {
        self.applied.push(changes.clone());
        self.watched_seen = self.watched.as_ref().map(|p| p.exists());
        match &self.failure {
            Some(messages) => {
                self.errors = messages.clone();
                Err(ImportError::new(messages.clone()))
            }
            None => Ok(()),
        }
    }

    fn errors(&self) -> &[String] {
        &self.errors
    }
}

struct Answer {
    yes: bool,
    asked: usize,
}

impl Answer {
    fn yes() -> Self {
        Self { yes: true, asked: 0 }
    }

    fn no() -> Self {
        Self { yes: false, asked: 0 }
    }
}

impl Confirm for Answer {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        self.asked += 1;
        Ok(self.yes)
    }
}

struct Project {
    temp: TempDir,
    staging: PathBuf,
    active: PathBuf,
}

impl Project {
    /// Staged {A: v2, B: v1, ignore.C: x}, active {A: v1, B: v1, C: v1}.
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let staging = temp.path().join("sync");
        let active = temp.path().join("active");
        write(&staging.join("A.yml"), "v: 2\n");
        write(&staging.join("B.yml"), "v: 1\n");
        write(&staging.join("ignore.C.yml"), "x: true\n");
        write(&active.join("A.yml"), "v: 1\n");
        write(&active.join("B.yml"), "v: 1\n");
        write(&active.join("C.yml"), "v: 1\n");
        Self {
            temp,
            staging,
            active,
        }
    }

    fn stores(&self) -> (FileStore, FileStore) {
        (
            FileStore::single(&self.staging, "yml"),
            FileStore::single(&self.active, "yml"),
        )
    }

    fn masker(&self) -> StagingMasker {
        StagingMasker::new(self.temp.path().join("scratch"))
    }
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn run(
    staged: &dyn ConfigStore,
    active: &dyn ConfigStore,
    importer: &mut FakeImporter,
    masker: StagingMasker,
    confirm: &mut Answer,
) -> (Result<ImportOutcome>, String) {
    let mut out = Vec::new();
    let outcome = ImportCoordinator::new(staged, active, importer, masker).run(confirm, &mut out);
    (outcome, String::from_utf8(out).unwrap())
}

#[test]
fn test_plan_prunes_directive_and_target() {
    let p = Project::new();
    let (staged, active) = p.stores();
    let mut importer = FakeImporter::default();

    let plan = ImportCoordinator::new(&staged, &active, &mut importer, p.masker())
        .plan()
        .unwrap();

    assert_eq!(
        plan.changes.names(&Collection::default_collection(), ChangeOperation::Update),
        vec!["A"]
    );
    assert_eq!(plan.changes.len(), 1);
    assert_eq!(plan.exclusions.len(), 1);
    assert_eq!(plan.exclusions[0].target, "C");
}

#[test]
fn test_no_changes() {
    let staged = MemoryStore::new().with(&Collection::default_collection(), "a", "v: 1");
    let active = staged.clone();
    let temp = TempDir::new().unwrap();
    let mut importer = FakeImporter::default();
    let mut confirm = Answer::yes();

    let (outcome, out) = run(
        &staged,
        &active,
        &mut importer,
        StagingMasker::new(temp.path()),
        &mut confirm,
    );

    assert_eq!(outcome.unwrap(), ImportOutcome::NoChanges);
    assert_eq!(out, format!("{}\n", NO_CHANGES_MESSAGE));
    assert_eq!(confirm.asked, 0);
    assert!(importer.applied.is_empty());
}

#[test]
fn test_only_excluded_changes_count_as_no_changes() {
    let default = Collection::default_collection();
    let staged = MemoryStore::new()
        .with(&default, "ignore.a", "x: 1")
        .with(&default, "a", "v: 2");
    let active = MemoryStore::new().with(&default, "a", "v: 1");
    let temp = TempDir::new().unwrap();
    let mut importer = FakeImporter::default();
    let mut confirm = Answer::yes();

    let (outcome, _) = run(
        &staged,
        &active,
        &mut importer,
        StagingMasker::new(temp.path()),
        &mut confirm,
    );

    assert_eq!(outcome.unwrap(), ImportOutcome::NoChanges);
    assert_eq!(confirm.asked, 0);
}

#[test]
fn test_abort_never_masks_or_applies() {
    let p = Project::new();
    let (staged, active) = p.stores();
    let mut importer = FakeImporter::default();
    let mut confirm = Answer::no();

    let (outcome, out) = run(&staged, &active, &mut importer, p.masker(), &mut confirm);

    assert_eq!(outcome.unwrap(), ImportOutcome::Aborted);
    assert!(out.contains("Collection"));
    assert_eq!(confirm.asked, 1);
    assert!(importer.applied.is_empty());
    assert!(!p.temp.path().join("scratch").exists());
}

#[test]
fn test_conflict_unmasks_without_applying() {
    let p = Project::new();
    let (staged, active) = p.stores();
    let mut importer = FakeImporter {
        busy: true,
        ..Default::default()
    };
    let mut confirm = Answer::yes();

    let (outcome, _) = run(&staged, &active, &mut importer, p.masker(), &mut confirm);

    assert_eq!(outcome.unwrap(), ImportOutcome::Conflict);
    assert!(importer.applied.is_empty());
    assert_eq!(
        fs::read_to_string(p.staging.join("ignore.C.yml")).unwrap(),
        "x: true\n"
    );
    assert_eq!(fs::read_to_string(p.active.join("A.yml")).unwrap(), "v: 1\n");
}

#[test]
fn test_success_hides_excluded_artifacts_during_apply() {
    let p = Project::new();
    let (staged, active) = p.stores();
    let mut importer = FakeImporter {
        watched: Some(p.staging.join("ignore.C.yml")),
        ..Default::default()
    };
    let mut confirm = Answer::yes();

    let (outcome, out) = run(&staged, &active, &mut importer, p.masker(), &mut confirm);

    assert_eq!(outcome.unwrap(), ImportOutcome::Succeeded { applied: 1 });
    assert!(out.ends_with(&format!("{}\n", SUCCESS_MESSAGE)));
    assert_eq!(importer.watched_seen, Some(false));
    assert_eq!(importer.applied.len(), 1);
    assert!(!importer.applied[0].contains(&Collection::default_collection(), "C"));
    assert!(p.staging.join("ignore.C.yml").exists());
}

#[test]
fn test_failure_unmasks_and_reports_messages() {
    let p = Project::new();
    let (staged, active) = p.stores();
    let mut importer = FakeImporter {
        failure: Some(vec!["A: rejected".to_string()]),
        ..Default::default()
    };
    let mut confirm = Answer::yes();

    let (outcome, out) = run(&staged, &active, &mut importer, p.masker(), &mut confirm);

    let outcome = outcome.unwrap();
    assert_eq!(
        outcome,
        ImportOutcome::Failed {
            messages: vec!["A: rejected".to_string()]
        }
    );
    assert!(!out.contains(SUCCESS_MESSAGE));
    assert!(p.staging.join("ignore.C.yml").exists());
    assert!(matches!(outcome.into_result(), Err(SyncError::ImportError(_))));
}

#[test]
fn test_store_error_aborts_before_masking() {
    let p = Project::new();
    write(&p.staging.join("B.yml"), "v: [unclosed\n");
    let (staged, active) = p.stores();
    let mut importer = FakeImporter::default();
    let mut confirm = Answer::yes();

    let (outcome, _) = run(&staged, &active, &mut importer, p.masker(), &mut confirm);

    assert!(matches!(outcome, Err(SyncError::StoreError(_))));
    assert_eq!(confirm.asked, 0);
    assert!(!p.temp.path().join("scratch").exists());
}

#[test]
fn test_custom_directive_prefix() {
    let default = Collection::default_collection();
    let staged = MemoryStore::new()
        .with(&default, "skip.a", "x: 1")
        .with(&default, "ignore.b", "x: 1");
    let active = MemoryStore::new();
    let mut importer = FakeImporter::default();

    let plan = ImportCoordinator::new(
        &staged,
        &active,
        &mut importer,
        StagingMasker::new(std::env::temp_dir()),
    )
    .with_directive_prefix("skip.")
    .plan()
    .unwrap();

    assert_eq!(plan.exclusions.len(), 1);
    assert!(plan.changes.contains(&default, "ignore.b"));
}

#[test]
fn test_outcome_into_result() {
    assert!(matches!(
        ImportOutcome::Aborted.into_result(),
        Err(SyncError::Aborted)
    ));
    assert!(matches!(
        ImportOutcome::Conflict.into_result(),
        Err(SyncError::ConflictError(_))
    ));
    assert_eq!(
        ImportOutcome::NoChanges.into_result().unwrap(),
        ImportOutcome::NoChanges
    );
}
