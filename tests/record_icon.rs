use corekit::config::CoreConfig;
use corekit::error::{CoreError, Result};
use corekit::icon::{HasIcon, IconRecord, IconSource};
use corekit::record::{Locales, Record, Schema};
use corekit::storage::{DiskRegistry, MemoryBackend, Storage, StorageBackend};
use serde_json::json;
use std::fs;
use std::rc::Rc;
use tempfile::TempDir;

static USER: Schema = Schema::new("user", "users").translatable(&["bio"]);

/// Host-application record with a fake persistence engine.
struct User {
    record: Record,
    saved: u32,
    deleted: bool,
}

impl User {
    fn new(id: i64) -> Self {
        let mut record = Record::new(&USER, Locales::new("en", "en", "en"));
        record.set_raw_attribute("id", json!(id));
        Self {
            record,
            saved: 0,
            deleted: false,
        }
    }
}

impl IconRecord for User {
    fn record(&self) -> &Record {
        &self.record
    }

    fn record_mut(&mut self) -> &mut Record {
        &mut self.record
    }

    fn save(&mut self) -> Result<()> {
        self.saved += 1;
        Ok(())
    }

    fn delete_record(&mut self) -> Result<()> {
        self.deleted = true;
        Ok(())
    }
}

impl HasIcon for User {}

fn setup() -> (Rc<MemoryBackend>, Storage, CoreConfig) {
    let backend = Rc::new(MemoryBackend::new());
    let mut registry = DiskRegistry::new("public");
    registry.register("public", Rc::clone(&backend) as Rc<dyn StorageBackend>);

    let mut config = CoreConfig::default();
    config.public_disk = "public".to_string();
    config.private_disk = "public".to_string();

    let storage = Storage::new(&registry, &config, true).unwrap();
    (backend, storage, config)
}

// 1x1 transparent GIF
const GIF_BYTES: &[u8] = &[
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x21, 0xF9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2C, 0x00, 0x00,
    0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x44, 0x01, 0x00, 0x3B,
];

const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

#[test]
fn test_save_icon_writes_named_file_and_persists() {
    let (backend, storage, config) = setup();
    let mut user = User::new(7);

    user.save_icon(&storage, &config, IconSource::Bytes(GIF_BYTES))
        .unwrap();

    assert_eq!(user.icon_file(), Some("7.gif".to_string()));
    assert!(backend.exists("assets/images/users/7.gif"));
    assert_eq!(user.saved, 1);
}

#[test]
fn test_save_icon_replaces_old_file() {
    let (backend, storage, config) = setup();
    let mut user = User::new(7);

    user.save_icon(&storage, &config, IconSource::Bytes(GIF_BYTES))
        .unwrap();
    user.save_icon(&storage, &config, IconSource::Bytes(PNG_BYTES))
        .unwrap();

    assert!(!backend.exists("assets/images/users/7.gif"));
    assert!(backend.exists("assets/images/users/7.png"));
    assert_eq!(user.icon_file(), Some("7.png".to_string()));
}

#[test]
fn test_save_icon_from_upload_copies_verbatim() {
    let (backend, storage, config) = setup();
    let dir = TempDir::new().unwrap();
    let upload = dir.path().join("animated.gif");
    fs::write(&upload, GIF_BYTES).unwrap();

    let mut user = User::new(3);
    user.save_icon(&storage, &config, IconSource::Upload(&upload))
        .unwrap();

    let stored = backend.read("assets/images/users/3.gif").unwrap().unwrap();
    assert_eq!(stored, GIF_BYTES);
}

#[test]
fn test_save_icon_rejects_undecodable_source() {
    let (_backend, storage, config) = setup();
    let mut user = User::new(1);

    let err = user
        .save_icon(&storage, &config, IconSource::Bytes(b"not an image"))
        .unwrap_err();
    assert!(matches!(err, CoreError::Decode));
    assert_eq!(user.icon_file(), None);
    assert_eq!(user.saved, 0);
}

#[test]
fn test_delete_icon_without_icon_is_noop() {
    let (_backend, storage, config) = setup();
    let mut user = User::new(1);

    user.delete_icon(&storage, &config);
    assert_eq!(user.icon_file(), None);
}

#[test]
fn test_delete_cleans_icon_then_deletes_record() {
    let (backend, storage, config) = setup();
    let mut user = User::new(9);

    user.save_icon(&storage, &config, IconSource::Bytes(PNG_BYTES))
        .unwrap();
    assert!(backend.exists("assets/images/users/9.png"));

    user.delete(&storage, &config).unwrap();
    assert!(!backend.exists("assets/images/users/9.png"));
    assert!(user.deleted);
}

#[test]
fn test_icon_url_and_basename_normalization() {
    let (_backend, storage, config) = setup();
    let mut user = User::new(5);

    user.set_icon("https://somewhere.test/uploads/5.png");
    assert_eq!(user.icon_file(), Some("5.png".to_string()));
    assert_eq!(
        user.icon_url(&storage, &config),
        Some("memory://disk/assets/images/users/5.png".to_string())
    );
}
