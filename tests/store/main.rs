mod support;

use std::sync::{mpsc, Mutex};
use std::time::Duration;

use support::{react_store, store_with, FlakyStore};
use tech_tracker::{
    filter_records, import_json, BulkError, Category, ChangeKind, FormatError, ImportMode,
    KeyValueStore, NewTechnology, Priority, RecordId, RecordPatch, RecordQuery, RecordStore,
    Settings, SortKey, Status, StoreConfig, TrackerError, TECHNOLOGIES_KEY,
};

// =============================================================================
// CRUD and statistics
// =============================================================================

#[test]
fn add_then_complete_reports_half_done() {
    let mut store = react_store();

    let vue = store.add(NewTechnology::new("Vue")).unwrap();
    assert_eq!(vue.id, RecordId::new(2));

    store
        .update(RecordId::new(2), &RecordPatch::status(Status::Completed))
        .unwrap();

    let stats = store.stats();
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.total, 2);
    assert_eq!(stats.percent_complete, 50);
}

#[test]
fn delete_twice_matches_delete_once() {
    let mut store = react_store();
    let vue = store.add(NewTechnology::new("Vue")).unwrap();

    assert!(store.delete(vue.id));
    let after_once = store.list();
    let revision = store.revision();

    assert!(!store.delete(vue.id));
    assert_eq!(store.list(), after_once);
    assert_eq!(store.revision(), revision);
}

#[test]
fn update_never_changes_identity() {
    let mut store = react_store();
    let patch: RecordPatch =
        serde_json::from_str(r#"{"title":"React 19","status":"in-progress"}"#).unwrap();

    let updated = store.update(RecordId::new(1), &patch).unwrap().unwrap();
    assert_eq!(updated.id, RecordId::new(1));
    assert_eq!(updated.title, "React 19");
    assert_eq!(store.require(RecordId::new(1)).unwrap().status, Status::InProgress);
}

#[test]
fn require_reports_missing_ids() {
    let store = react_store();
    let err = store.require(RecordId::new(5)).unwrap_err();
    assert!(matches!(err, TrackerError::NotFound(id) if id == RecordId::new(5)));
}

#[test]
fn settings_defaults_fill_new_records() {
    let mut store = react_store();
    let settings = Settings {
        default_priority: Priority::High,
        ..Default::default()
    };

    let record = store
        .add(settings.apply_defaults(NewTechnology::new("Tailwind")))
        .unwrap();
    assert_eq!(record.category, Category::from("frontend"));
    assert_eq!(record.priority, Some(Priority::High));
}

// =============================================================================
// Import
// =============================================================================

#[test]
fn import_drops_entries_without_title() {
    let records = import_json(r#"[{"title":"X"},{"foo":"bar"}]"#).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "X");

    let mut store = react_store();
    let summary = store
        .import_json(r#"[{"title":"X"},{"foo":"bar"}]"#, ImportMode::Merge)
        .unwrap();
    assert_eq!(summary.added, 1);
    assert_eq!(store.len(), 2);
}

#[test]
fn malformed_import_leaves_collection_unchanged() {
    let mut store = react_store();
    let before = store.list();

    let err = store.import_json("not json", ImportMode::Replace).unwrap_err();
    assert!(matches!(err, TrackerError::Format(FormatError::Json(_))));

    let err = store.import_json(r#"{"title":"X"}"#, ImportMode::Replace).unwrap_err();
    assert!(matches!(err, TrackerError::Format(FormatError::NotAnArray(_))));

    assert_eq!(store.list(), before);
    assert_eq!(store.revision(), 0);
}

#[test]
fn export_then_replace_restores_the_collection() {
    let mut store = store_with(
        r#"[
            {"id":1,"title":"React","category":"frontend","priority":"high"},
            {"id":2,"title":"Postgres","category":"database","status":"completed","deadline":"2025-05-01"}
        ]"#,
    );
    let exported = store.export_json().unwrap();
    let before = store.list();

    store.clear();
    assert!(store.is_empty());

    let summary = store.import_json(&exported, ImportMode::Replace).unwrap();
    assert_eq!(summary.added, 2);
    assert_eq!(store.list(), before);
}

// =============================================================================
// Bulk update
// =============================================================================

#[test]
fn bulk_update_ignores_missing_ids() {
    let mut store = store_with(
        r#"[{"id":1,"title":"React","category":"frontend"},{"id":2,"title":"Vue","category":"frontend"}]"#,
    );

    let report = store
        .bulk_update(
            &[RecordId::new(1), RecordId::new(3)],
            &RecordPatch::new().with_category("backend"),
        )
        .unwrap();

    assert_eq!(report.updated, vec![RecordId::new(1)]);
    assert_eq!(report.ignored, vec![RecordId::new(3)]);
    assert_eq!(store.records()[0].category, Category::from("backend"));
    assert_eq!(store.records()[1].category, Category::from("frontend"));
}

#[test]
fn bulk_update_rejects_no_op_requests() {
    let mut store = react_store();
    let before = store.list();

    let err = store
        .bulk_update(&[], &RecordPatch::status(Status::Completed))
        .unwrap_err();
    assert!(matches!(err, TrackerError::Bulk(BulkError::EmptySelection)));

    let err = store
        .bulk_update(&[RecordId::new(1)], &RecordPatch::new())
        .unwrap_err();
    assert!(matches!(err, TrackerError::Bulk(BulkError::EmptyPatch)));

    assert_eq!(store.list(), before);
}

// =============================================================================
// Views
// =============================================================================

#[test]
fn views_read_the_live_collection() {
    let mut store = RecordStore::open(
        tech_tracker::InMemoryKeyValueStore::new(),
        StoreConfig::default(),
    );
    store.add(NewTechnology::new("TypeScript").with_category("language")).unwrap();

    let hits = filter_records(store.records(), "TYPESCRIPT");
    let titles: Vec<&str> = hits.iter().map(|record| record.title.as_str()).collect();
    assert_eq!(titles, vec!["TypeScript"]);

    let backlog = RecordQuery::new()
        .status(Status::NotStarted)
        .sorted_by(SortKey::Title)
        .run(store.records());
    let titles: Vec<&str> = backlog.iter().map(|record| record.title.as_str()).collect();
    assert_eq!(titles, vec!["Express.js", "React Components", "TypeScript"]);
}

// =============================================================================
// Persistence failures
// =============================================================================

#[test]
fn storage_failure_keeps_memory_authoritative() {
    let storage = FlakyStore::new();
    let mut store = RecordStore::open(storage.clone(), StoreConfig::default());
    assert!(!store.is_degraded());

    storage.fail_writes(true);
    let rust = store.add(NewTechnology::new("Rust")).unwrap();
    assert!(store.is_degraded());
    assert!(store.get(rust.id).is_some());
    let stored = storage.get(TECHNOLOGIES_KEY).unwrap().unwrap();
    assert!(!stored.contains("Rust"));

    storage.fail_writes(false);
    store.set_status(rust.id, Status::InProgress);
    assert!(!store.is_degraded());
    let stored = storage.get(TECHNOLOGIES_KEY).unwrap().unwrap();
    assert!(stored.contains("Rust"));
}

#[test]
fn flush_surfaces_the_storage_error() {
    let storage = FlakyStore::new();
    let mut store = RecordStore::open(storage.clone(), StoreConfig::default());

    storage.fail_writes(true);
    let err = store.flush().unwrap_err();
    assert!(matches!(err, TrackerError::Storage(_)));
    assert!(store.is_degraded());
}

#[test]
fn every_mutation_is_mirrored() {
    let storage = tech_tracker::InMemoryKeyValueStore::new();
    let mut store = RecordStore::open(storage.clone(), StoreConfig::default());

    store.cycle_status(RecordId::new(1));
    let stored = import_json(&storage.get(TECHNOLOGIES_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored.as_slice(), store.records());
}

// =============================================================================
// Change notification
// =============================================================================

#[cfg(feature = "emitter")]
#[test]
fn subscribers_receive_each_commit() {
    let mut store = react_store();
    let (tx, rx) = mpsc::channel();
    let tx = Mutex::new(tx);
    store.subscribe(move |change| {
        let _ = tx.lock().unwrap().send(change);
    });

    store.add(NewTechnology::new("Vue")).unwrap();

    let change = rx.recv_timeout(Duration::from_secs(1)).unwrap();
    assert_eq!(change.kind, ChangeKind::Added);
    assert_eq!(change.ids, vec![2]);
    assert_eq!(change.revision, 1);
    assert_eq!(change.total, 2);
}

#[cfg(feature = "emitter")]
#[test]
fn unsubscribed_listeners_stay_quiet() {
    let mut store = react_store();
    let (tx, rx) = mpsc::channel();
    let tx = Mutex::new(tx);
    let listener = store.subscribe(move |change| {
        let _ = tx.lock().unwrap().send(change);
    });

    assert!(store.unsubscribe(&listener));
    store.delete(RecordId::new(1));
    assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
}

#[cfg(feature = "emitter")]
#[test]
fn no_op_calls_do_not_notify() {
    let mut store = react_store();
    let (tx, rx) = mpsc::channel();
    let tx = Mutex::new(tx);
    store.subscribe(move |change| {
        let _ = tx.lock().unwrap().send(change);
    });

    store.delete(RecordId::new(99));
    store.update(RecordId::new(99), &RecordPatch::status(Status::Completed)).unwrap();
    assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
}
