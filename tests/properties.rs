use chrono::NaiveDate;
use proptest::prelude::*;

use tech_tracker::{
    bulk_update, compute_stats, export_json, filter_records, import_json, BulkError, Category,
    Difficulty, InMemoryKeyValueStore, Priority, RecordId, RecordPatch, RecordStore, Status,
    StoreConfig, TechnologyRecord,
};

fn status() -> impl Strategy<Value = Status> {
    prop_oneof![
        Just(Status::NotStarted),
        Just(Status::InProgress),
        Just(Status::Completed),
    ]
}

fn priority() -> impl Strategy<Value = Priority> {
    prop_oneof![Just(Priority::High), Just(Priority::Medium), Just(Priority::Low)]
}

fn difficulty() -> impl Strategy<Value = Difficulty> {
    prop_oneof![
        Just(Difficulty::Beginner),
        Just(Difficulty::Intermediate),
        Just(Difficulty::Advanced),
    ]
}

fn record() -> impl Strategy<Value = TechnologyRecord> {
    (
        "[A-Za-z][A-Za-z0-9 .#+-]{0,20}",
        "[a-z ,]{0,30}",
        prop::sample::select(Category::KNOWN.to_vec()),
        status(),
        prop::option::of(difficulty()),
        prop::option::of(priority()),
        prop::option::of((2000i32..2030, 1u32..=12, 1u32..=28)),
        prop::option::of("[a-z ]{0,20}"),
        prop::collection::vec("https://[a-z]{1,10}\\.dev", 0..3),
    )
        .prop_map(
            |(title, description, category, status, difficulty, priority, deadline, notes, resources)| {
                TechnologyRecord {
                    id: RecordId::UNASSIGNED,
                    title,
                    description,
                    category: Category::from(category),
                    status,
                    difficulty,
                    priority,
                    deadline: deadline.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
                    notes,
                    resources,
                    created_at: None,
                }
            },
        )
}

/// Collections with unique ids 1..=n.
fn records() -> impl Strategy<Value = Vec<TechnologyRecord>> {
    prop::collection::vec(record(), 0..12).prop_map(|mut records| {
        for (index, record) in records.iter_mut().enumerate() {
            record.id = RecordId::new(index as u64 + 1);
        }
        records
    })
}

proptest! {
    #[test]
    fn stats_counts_add_up(records in records()) {
        let stats = compute_stats(&records);
        prop_assert_eq!(stats.total, records.len());
        prop_assert_eq!(stats.completed + stats.in_progress + stats.not_started, stats.total);
        prop_assert!(stats.percent_complete <= 100);
        prop_assert_eq!(stats.by_category.values().sum::<usize>(), stats.total);
        prop_assert_eq!(stats.by_priority.values().sum::<usize>(), stats.total);
    }

    #[test]
    fn export_import_round_trips(records in records()) {
        let text = export_json(&records).unwrap();
        prop_assert_eq!(import_json(&text).unwrap(), records);
    }

    #[test]
    fn blank_query_keeps_everything_in_order(records in records(), blank in "[ \t]{0,3}") {
        let hits: Vec<TechnologyRecord> =
            filter_records(&records, &blank).into_iter().cloned().collect();
        prop_assert_eq!(hits, records);
    }

    #[test]
    fn filter_hits_contain_the_query(records in records(), query in "[a-z]{1,3}") {
        for hit in filter_records(&records, &query) {
            let haystack = format!("{} {} {}", hit.title, hit.description, hit.category)
                .to_lowercase();
            prop_assert!(haystack.contains(&query));
        }
    }

    #[test]
    fn empty_selection_changes_nothing(records in records(), status in status()) {
        let patch = RecordPatch::status(status);
        prop_assert_eq!(bulk_update(&records, &[], &patch), Err(BulkError::EmptySelection));

        let mut store = RecordStore::open(
            InMemoryKeyValueStore::new(),
            StoreConfig::default().with_seed(records.clone()),
        );
        prop_assert!(store.bulk_update(&[], &patch).is_err());
        prop_assert_eq!(store.records(), records.as_slice());
    }

    #[test]
    fn bulk_touches_only_selected(records in records(), pick in prop::collection::vec(1u64..16, 1..5)) {
        let ids: Vec<RecordId> = pick.into_iter().map(RecordId::new).collect();
        let patch = RecordPatch::new().with_category("backend");
        let outcome = bulk_update(&records, &ids, &patch).unwrap();

        prop_assert_eq!(outcome.records.len(), records.len());
        for (before, after) in records.iter().zip(&outcome.records) {
            prop_assert_eq!(before.id, after.id);
            if ids.contains(&before.id) {
                prop_assert_eq!(after.category.as_str(), "backend");
            } else {
                prop_assert_eq!(before, after);
            }
        }
    }

    #[test]
    fn delete_is_idempotent(records in records(), target in 1u64..16) {
        let mut store = RecordStore::open(
            InMemoryKeyValueStore::new(),
            StoreConfig::default().with_seed(records),
        );
        let id = RecordId::new(target);

        store.delete(id);
        let once = store.list();
        let removed_again = store.delete(id);

        prop_assert!(!removed_again);
        prop_assert_eq!(store.list(), once);
        prop_assert!(store.get(id).is_none());
    }
}
