use ledgerapp::model::{NewRecord, SettingsPatch, Theme};
use ledgerapp::store::{FsBackend, LedgerStore, StorageBackend, RECORDS_KEY, SETTINGS_KEY};
use std::fs;
use tempfile::TempDir;

fn setup() -> (TempDir, FsBackend) {
    let dir = TempDir::new().unwrap();
    let backend = FsBackend::new(dir.path().join("ledger"));
    (dir, backend)
}

#[test]
fn test_fs_backend_basic_slot_io() {
    let (_dir, backend) = setup();

    assert!(backend.read("missing").unwrap().is_none());
    backend.write("slot", b"[1,2,3]").unwrap();
    assert_eq!(backend.read("slot").unwrap(), Some(b"[1,2,3]".to_vec()));

    backend.write("slot", b"[]").unwrap();
    assert_eq!(backend.read("slot").unwrap(), Some(b"[]".to_vec()));
}

#[test]
fn test_fs_backend_creates_root_on_first_write() {
    let (dir, backend) = setup();
    let root = dir.path().join("ledger");
    assert!(backend.is_available());
    assert!(backend.read(RECORDS_KEY).unwrap().is_none());
    assert!(!root.exists());

    backend.write(RECORDS_KEY, b"[]").unwrap();
    assert!(root.is_dir());
}

#[test]
fn test_loading_leaves_missing_root_alone() {
    let (dir, backend) = setup();
    let mut store = LedgerStore::with_backend(backend);
    store.init(Vec::new());
    assert!(store.is_empty());
    assert!(!dir.path().join("ledger").exists());

    store.add_record(NewRecord::new("Coffee", 3.5, "Food", "2024-03-01"));
    assert!(store.last_save_succeeded());
    assert!(dir.path().join("ledger").join("finance_data_v1.json").exists());
}

#[test]
fn test_root_that_is_a_file_is_unavailable() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ledger");
    fs::write(&path, "not a directory").unwrap();
    assert!(!FsBackend::new(path).is_available());
}

#[test]
fn test_fs_backend_atomic_write_artifacts() {
    let (_dir, backend) = setup();
    backend.write(RECORDS_KEY, b"[]").unwrap();

    let expected = backend.root().join("finance_data_v1.json");
    assert!(expected.exists());
    assert_eq!(backend.slot_path(RECORDS_KEY), expected);

    for entry in fs::read_dir(backend.root()).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
    }
}

#[test]
fn test_store_state_survives_reopen() {
    let (dir, backend) = setup();
    let mut store = LedgerStore::with_backend(backend);
    store.init(Vec::new());
    let coffee = store.add_record(NewRecord::new("Coffee", 3.5, "Food", "2024-03-01"));
    store.add_record(NewRecord::new("Bus", 2.0, "Transport", "2024-03-02"));
    store.save_settings(SettingsPatch {
        theme: Some(Theme::Dark),
        ..Default::default()
    });
    store.delete_record(&coffee.id);
    assert!(store.last_save_succeeded());

    let mut reopened = LedgerStore::with_backend(FsBackend::new(dir.path().join("ledger")));
    reopened.init(Vec::new());
    assert_eq!(reopened.records(), store.records());
    assert_eq!(reopened.settings().theme, Some(Theme::Dark));
}

#[test]
fn test_corrupt_slots_load_as_empty() {
    let (dir, backend) = setup();
    backend.write(RECORDS_KEY, b"{truncated").unwrap();
    backend.write(SETTINGS_KEY, b"\"just a string\"").unwrap();

    let mut store = LedgerStore::with_backend(FsBackend::new(dir.path().join("ledger")));
    store.init(Vec::new());
    assert!(store.is_empty());
    assert_eq!(store.settings().base_currency, "USD");
}

#[cfg(unix)]
#[test]
fn test_unwritable_root_keeps_memory_state() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "file in the way").unwrap();

    let mut store = LedgerStore::with_backend(FsBackend::new(blocker.join("ledger")));
    store.init(Vec::new());
    let record = store.add_record(NewRecord::new("Coffee", 3.5, "Food", "2024-03-01"));

    assert!(!store.last_save_succeeded());
    assert_eq!(store.get_record(&record.id), Some(record));
}
