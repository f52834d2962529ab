use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};
use tempfile::TempDir;

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

pub(crate) fn write_file(path: &Path, content: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// A project with default layout and the scratch area kept inside it.
///
/// Staged: `A` (changed), `B` (unchanged), `ignore.C` (empty, so it fails
/// staged-tree validation unless masked), `language/fr/site` (new).
/// Active: `A`, `B`, `C`.
pub(crate) fn create_test_project() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    write_file(&root.join("confsync.yaml"), "scratch_dir: .scratch\n");

    let sync = root.join("config/sync");
    write_file(&sync.join("A.yml"), "name: A\nvalue: 2\n");
    write_file(&sync.join("B.yml"), "name: B\n");
    write_file(&sync.join("ignore.C.yml"), "");
    write_file(&sync.join("language/fr/site.yml"), "name: Site FR\n");

    let active = root.join("config/active");
    write_file(&active.join("A.yml"), "name: A\nvalue: 1\n");
    write_file(&active.join("B.yml"), "name: B\n");
    write_file(&active.join("C.yml"), "name: C\n");

    temp_dir
}
