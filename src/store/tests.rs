//! Tests for the config stores.

use super::*;
use std::fs;
use tempfile::TempDir;

fn write(dir: &std::path::Path, relative: &str, content: &str) {
    let path = dir.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn test_collection_relative_dir() {
    assert_eq!(Collection::default_collection().relative_dir(), PathBuf::new());
    assert_eq!(
        Collection::named("language.fr").relative_dir(),
        PathBuf::from("language").join("fr")
    );
}

#[test]
fn test_collection_display() {
    assert_eq!(Collection::default_collection().to_string(), "default");
    assert_eq!(Collection::named("language.de").to_string(), "language.de");
}

#[test]
fn test_validate_config_name() {
    assert!(validate_config_name("system.site").is_ok());
    assert!(validate_config_name("ignore.").is_ok());
    assert!(validate_config_name("").is_err());
    assert!(validate_config_name("..").is_err());
    assert!(validate_config_name("../etc/passwd").is_err());
    assert!(validate_config_name("a\\b").is_err());
}

#[test]
fn test_file_store_lists_names_with_extension_only() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "system.site.yml", "name: Site\n");
    write(temp.path(), "notes.txt", "not config");
    write(temp.path(), ".system.site.yml.tmp", "partial");

    let store = FileStore::single(temp.path(), "yml");
    let names = store.list_names(&Collection::default_collection()).unwrap();

    assert_eq!(names, BTreeSet::from(["system.site".to_string()]));
}

#[test]
fn test_file_store_missing_directory_is_empty() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::single(temp.path().join("absent"), "yml");

    let names = store.list_names(&Collection::default_collection()).unwrap();
    let collections = store.list_collections().unwrap();

    assert!(names.is_empty());
    assert_eq!(
        collections,
        BTreeSet::from([Collection::default_collection()])
    );
}

#[test]
fn test_file_store_layered_read_prefers_first_directory() {
    let temp = TempDir::new().unwrap();
    let local = temp.path().join("local");
    let shared = temp.path().join("shared");
    write(&local, "system.site.yml", "name: Local\n");
    write(&shared, "system.site.yml", "name: Shared\n");
    write(&shared, "system.performance.yml", "cache: true\n");

    let store = FileStore::new(vec![local, shared], "yml");
    let default = Collection::default_collection();

    assert_eq!(
        store.read(&default, "system.site").unwrap().unwrap(),
        b"name: Local\n"
    );
    assert_eq!(
        store.read(&default, "system.performance").unwrap().unwrap(),
        b"cache: true\n"
    );
    assert!(store.read(&default, "missing").unwrap().is_none());
    assert_eq!(store.list_names(&default).unwrap().len(), 2);
}

#[test]
fn test_file_store_discovers_nested_collections() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "system.site.yml", "name: Site\n");
    write(temp.path(), "language/fr/system.site.yml", "name: Site FR\n");
    write(temp.path(), ".confsync/locks/import.yml", "ignored: true\n");
    fs::create_dir_all(temp.path().join("empty")).unwrap();

    let store = FileStore::single(temp.path(), "yml");
    let collections = store.list_collections().unwrap();

    assert_eq!(
        collections,
        BTreeSet::from([
            Collection::default_collection(),
            Collection::named("language.fr"),
        ])
    );
    assert_eq!(
        store
            .read(&Collection::named("language.fr"), "system.site")
            .unwrap()
            .unwrap(),
        b"name: Site FR\n"
    );
}

#[test]
fn test_dotted_directory_is_rejected() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "a.yml", "name: A\n");
    write(temp.path(), "language/fr.be/site.yml", "name: Site\n");

    let store = FileStore::single(temp.path(), "yml");

    let err = store.list_collections().unwrap_err();
    assert!(matches!(err, SyncError::StoreError(_)));
    assert!(err.to_string().contains("fr.be"));
    assert!(store.artifact_paths().is_err());
}

#[test]
fn test_resolve_path_returns_holding_directories() {
    let temp = TempDir::new().unwrap();
    let local = temp.path().join("local");
    let shared = temp.path().join("shared");
    write(&shared, "foo.yml", "a: 1\n");
    fs::create_dir_all(&local).unwrap();

    let store = FileStore::new(vec![local.clone(), shared.clone()], "yml");
    let default = Collection::default_collection();

    assert_eq!(store.resolve_path(&default, "foo"), vec![shared.clone()]);
    assert_eq!(store.resolve_path(&default, "missing"), vec![local, shared]);
}

#[test]
fn test_artifact_paths_include_shadowed_files() {
    let temp = TempDir::new().unwrap();
    let local = temp.path().join("local");
    let shared = temp.path().join("shared");
    write(&local, "foo.yml", "a: 1\n");
    write(&shared, "foo.yml", "a: 2\n");
    write(&shared, "language/fr/foo.yml", "a: 3\n");

    let store = FileStore::new(vec![local.clone(), shared.clone()], "yml");
    let mut paths = store.artifact_paths().unwrap();
    paths.sort();

    let mut expected = vec![
        local.join("foo.yml"),
        shared.join("foo.yml"),
        shared.join("language/fr/foo.yml"),
    ];
    expected.sort();
    assert_eq!(paths, expected);
}

#[test]
fn test_memory_store_roundtrip() {
    let default = Collection::default_collection();
    let fr = Collection::named("language.fr");
    let mut store = MemoryStore::new()
        .with(&default, "a", "v1")
        .with(&fr, "b", "v2");

    assert_eq!(store.read(&default, "a").unwrap().unwrap(), b"v1");
    assert_eq!(store.list_collections().unwrap().len(), 2);
    assert!(store.resolve_path(&default, "a").is_empty());

    assert_eq!(store.remove(&fr, "b"), Some(b"v2".to_vec()));
    assert_eq!(store.list_collections().unwrap().len(), 1);
    assert!(store.list_names(&fr).unwrap().is_empty());
}
