use corekit::config::CoreConfig;
use corekit::error::CoreError;
use corekit::storage::{DiskRegistry, LocalBackend, MemoryBackend, Storage, StorageBackend};
use std::fs;
use std::rc::Rc;
use tempfile::TempDir;

fn local_setup() -> (TempDir, DiskRegistry, CoreConfig) {
    let dir = TempDir::new().unwrap();
    let backend = LocalBackend::new(dir.path(), "https://cdn.test/files");
    let mut registry = DiskRegistry::new("local");
    registry.register("local", Rc::new(backend));

    let mut config = CoreConfig::default();
    config.private_disk = "local".to_string();
    config.public_disk = "local".to_string();
    (dir, registry, config)
}

fn remote_setup() -> (Rc<MemoryBackend>, DiskRegistry, CoreConfig) {
    let backend = Rc::new(MemoryBackend::new());
    let mut registry = DiskRegistry::new("remote");
    registry.register("remote", Rc::clone(&backend) as Rc<dyn StorageBackend>);

    let mut config = CoreConfig::default();
    config.private_disk = "remote".to_string();
    config.public_disk = "remote".to_string();
    (backend, registry, config)
}

#[test]
fn test_local_put_get_roundtrip() {
    let (_dir, registry, config) = local_setup();
    let storage = Storage::new(&registry, &config, false).unwrap();

    storage.put("docs/readme.txt", b"Hello World", None).unwrap();
    assert!(storage.exists("docs/readme.txt"));
    assert_eq!(storage.get("docs/readme.txt").unwrap(), "Hello World");
}

#[test]
fn test_local_write_leaves_no_tmp_files() {
    let (dir, registry, config) = local_setup();
    let storage = Storage::new(&registry, &config, false).unwrap();

    storage.put("docs/a.txt", b"Atomic", None).unwrap();

    let entries = fs::read_dir(dir.path().join("docs")).unwrap();
    for entry in entries {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
    }
}

#[test]
fn test_get_missing_file_is_not_found() {
    let (_dir, registry, config) = local_setup();
    let storage = Storage::new(&registry, &config, false).unwrap();

    assert!(matches!(
        storage.get("nope.txt"),
        Err(CoreError::NotFound(_))
    ));
}

#[test]
fn test_append_and_copy_and_move() {
    let (_dir, registry, config) = local_setup();
    let storage = Storage::new(&registry, &config, false).unwrap();

    storage.put("log.txt", b"one", None).unwrap();
    storage.append("log.txt", b" two").unwrap();
    assert_eq!(storage.get("log.txt").unwrap(), "one two");

    storage.copy("log.txt", "backup/log.txt").unwrap();
    assert_eq!(storage.get("backup/log.txt").unwrap(), "one two");

    storage.move_file("log.txt", "archive/log.txt").unwrap();
    assert!(!storage.exists("log.txt"));
    assert_eq!(storage.get("archive/log.txt").unwrap(), "one two");
}

#[test]
fn test_copy_directory_substitutes_prefix() {
    let (_dir, registry, config) = local_setup();
    let storage = Storage::new(&registry, &config, false).unwrap();

    storage.put("src/a.txt", b"a", None).unwrap();
    storage.put("src/nested/b.txt", b"b", None).unwrap();

    storage.copy_directory("src", "dst").unwrap();

    assert_eq!(storage.get("dst/a.txt").unwrap(), "a");
    assert_eq!(storage.get("dst/nested/b.txt").unwrap(), "b");
    // Source stays intact on copy
    assert!(storage.exists("src/a.txt"));
}

#[test]
fn test_move_directory_removes_local_source_tree() {
    let (dir, registry, config) = local_setup();
    let storage = Storage::new(&registry, &config, false).unwrap();

    storage.put("src/a.txt", b"a", None).unwrap();
    storage.put("src/nested/b.txt", b"b", None).unwrap();

    storage.move_directory("src", "dst").unwrap();

    assert_eq!(storage.get("dst/nested/b.txt").unwrap(), "b");
    assert!(!dir.path().join("src").exists());
}

#[test]
fn test_delete_directory_local() {
    let (dir, registry, config) = local_setup();
    let storage = Storage::new(&registry, &config, false).unwrap();

    storage.put("junk/a.txt", b"a", None).unwrap();
    storage.delete_directory("junk").unwrap();
    assert!(!dir.path().join("junk").exists());
}

#[test]
fn test_delete_directory_remote_deletes_per_file() {
    let (backend, registry, config) = remote_setup();
    let storage = Storage::new(&registry, &config, false).unwrap();

    storage.put("junk/a.txt", b"a", None).unwrap();
    storage.put("junk/deep/b.txt", b"b", None).unwrap();
    storage.put("keep.txt", b"k", None).unwrap();

    storage.delete_directory("junk").unwrap();

    assert!(!backend.exists("junk/a.txt"));
    assert!(!backend.exists("junk/deep/b.txt"));
    assert!(backend.exists("keep.txt"));
}

#[test]
fn test_public_remote_get_bypasses_cache_via_url() {
    let (backend, registry, config) = remote_setup();
    let storage = Storage::new(&registry, &config, true).unwrap();

    storage.put("img/banner.png", b"pixels", None).unwrap();
    assert_eq!(storage.get("img/banner.png").unwrap(), "pixels");

    let url = backend.last_url_read().expect("should read through url");
    assert!(
        url.starts_with("memory://disk/img/banner.png?rand="),
        "unexpected url: {}",
        url
    );
}

#[test]
fn test_private_remote_get_uses_native_read() {
    let (backend, registry, config) = remote_setup();
    let storage = Storage::new(&registry, &config, false).unwrap();

    storage.put("img/banner.png", b"pixels", None).unwrap();
    assert_eq!(storage.get("img/banner.png").unwrap(), "pixels");
    assert!(backend.last_url_read().is_none());
}

#[test]
fn test_local_public_get_uses_native_read() {
    let (_dir, registry, config) = local_setup();
    let storage = Storage::new(&registry, &config, true).unwrap();

    storage.put("img/banner.png", b"pixels", None).unwrap();
    // Local disks never take the url detour, even with public visibility
    assert_eq!(storage.get("img/banner.png").unwrap(), "pixels");
}

#[test]
fn test_url_composition() {
    let (_dir, registry, config) = local_setup();
    let storage = Storage::new(&registry, &config, true).unwrap();
    assert_eq!(
        storage.url("assets/images/users/7.png"),
        "https://cdn.test/files/assets/images/users/7.png"
    );
}

#[test]
fn test_write_error_surfaces_as_storage_error() {
    let (backend, registry, config) = remote_setup();
    let storage = Storage::new(&registry, &config, false).unwrap();

    backend.set_simulate_write_error(true);
    assert!(matches!(
        storage.put("a.txt", b"x", None),
        Err(CoreError::Storage(_))
    ));
}

#[test]
fn test_listing_operations() {
    let (_dir, registry, config) = local_setup();
    let storage = Storage::new(&registry, &config, false).unwrap();

    storage.put("root/a.txt", b"a", None).unwrap();
    storage.put("root/sub/b.txt", b"b", None).unwrap();

    assert_eq!(storage.files("root").unwrap(), vec!["root/a.txt"]);
    assert_eq!(
        storage.all_files("root").unwrap(),
        vec!["root/a.txt", "root/sub/b.txt"]
    );
    assert_eq!(storage.directories("root").unwrap(), vec!["root/sub"]);
}
