use std::fs;

use tech_tracker::{
    FileKeyValueStore, KeyValueStore, LoadSource, NewTechnology, RecordId, RecordStore,
    Settings, Status, StoreConfig, Theme,
};
use tempfile::tempdir;

#[test]
fn reopening_restores_the_collection() {
    let dir = tempdir().unwrap();

    let saved = {
        let storage = FileKeyValueStore::open(dir.path()).unwrap();
        let mut store = RecordStore::open(storage, StoreConfig::default());
        assert_eq!(store.source(), &LoadSource::Seed);

        let rust = store.add(NewTechnology::new("Rust").with_category("language")).unwrap();
        store.set_status(rust.id, Status::InProgress);
        store.list()
    };

    let storage = FileKeyValueStore::open(dir.path()).unwrap();
    let store = RecordStore::open(storage, StoreConfig::default());
    assert_eq!(store.source(), &LoadSource::Stored);
    assert_eq!(store.list(), saved);
}

#[test]
fn ids_continue_after_reopen() {
    let dir = tempdir().unwrap();
    {
        let storage = FileKeyValueStore::open(dir.path()).unwrap();
        let mut store = RecordStore::open(storage, StoreConfig::default());
        store.add(NewTechnology::new("Rust")).unwrap();
    }

    let storage = FileKeyValueStore::open(dir.path()).unwrap();
    let mut store = RecordStore::open(storage, StoreConfig::default());
    let go = store.add(NewTechnology::new("Go")).unwrap();
    assert_eq!(go.id, RecordId::new(7));
}

#[test]
fn corrupt_file_falls_back_to_seed() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("technologies.json"), "{ definitely not json").unwrap();

    let storage = FileKeyValueStore::open(dir.path()).unwrap();
    let store = RecordStore::open(storage, StoreConfig::default());
    assert_eq!(store.source(), &LoadSource::Seed);
    assert_eq!(store.len(), 5);
    assert!(!store.is_degraded());
}

#[test]
fn legacy_file_is_migrated_to_primary_key() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("technology-tracker-progress.json"),
        r#"[{"id":10,"title":"Kotlin","isStudied":false}]"#,
    )
    .unwrap();

    let storage = FileKeyValueStore::open(dir.path()).unwrap();
    let store = RecordStore::open(storage.clone(), StoreConfig::default());
    assert_eq!(
        store.source(),
        &LoadSource::Legacy("technology-tracker-progress".to_string())
    );
    assert_eq!(store.records()[0].status, Status::NotStarted);
    assert!(dir.path().join("technologies.json").exists());
}

#[test]
fn custom_key_keeps_collections_apart() {
    let dir = tempdir().unwrap();
    let storage = FileKeyValueStore::open(dir.path()).unwrap();

    let mut work = RecordStore::open(
        storage.clone(),
        StoreConfig::default().with_key("work").with_seed(Vec::new()),
    );
    work.add(NewTechnology::new("Terraform")).unwrap();

    let personal = RecordStore::open(
        storage.clone(),
        StoreConfig::default().with_key("personal").with_seed(Vec::new()),
    );
    assert!(personal.is_empty());
    assert!(storage.get("work").unwrap().unwrap().contains("Terraform"));
}

#[test]
fn settings_live_next_to_the_collection() {
    let dir = tempdir().unwrap();
    let storage = FileKeyValueStore::open(dir.path()).unwrap();

    let settings = Settings {
        theme: Theme::Dark,
        ..Default::default()
    };
    settings.save(&storage).unwrap();
    let _store = RecordStore::open(storage.clone(), StoreConfig::default());

    let reopened = FileKeyValueStore::open(dir.path()).unwrap();
    assert_eq!(Settings::load(&reopened).theme, Theme::Dark);
    assert!(reopened.get("technologies").unwrap().is_some());
}
