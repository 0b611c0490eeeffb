//! Record Store - the single owner of the canonical technology collection.
//!
//! The collection is held behind an `Arc` and replaced copy-on-write, so a
//! snapshot taken with [`RecordStore::list`] never changes under its reader.
//! Every committed mutation bumps the revision, mirrors the collection into
//! the key-value store and notifies subscribers.
//!
//! Persistence failures never fail a mutation. They are logged, the store
//! reports itself degraded, and memory stays authoritative until a later write
//! succeeds.
//!
//! ## Example
//!
//! ```ignore
//! use tech_tracker::{InMemoryKeyValueStore, NewTechnology, RecordPatch, RecordStore, Status, StoreConfig};
//!
//! let mut store = RecordStore::open(InMemoryKeyValueStore::new(), StoreConfig::default());
//!
//! let rust = store.add(NewTechnology::new("Rust").with_category("language"))?;
//! store.update(rust.id, &RecordPatch::status(Status::InProgress))?;
//!
//! let stats = store.stats();
//! println!("{}% complete", stats.percent_complete);
//! ```

mod change;
mod config;

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use log::{debug, error, info, warn};
use rand::seq::IndexedRandom;
use rand::Rng;

#[cfg(feature = "emitter")]
use event_emitter_rs::EventEmitter;

use crate::bulk::{self, BulkOutcome};
use crate::codec::{self, FormatError};
use crate::error::TrackerError;
use crate::record::{NewTechnology, RecordId, RecordPatch, Status, TechnologyRecord};
use crate::stats::{compute_stats, Stats};
use crate::storage::KeyValueStore;
use crate::tasks::Roadmap;

pub use change::{ChangeKind, StoreChange, CHANGE_EVENT};
pub use config::{seed_technologies, StoreConfig};

/// Where the collection came from when the store was opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadSource {
    Stored,
    Legacy(String),
    Seed,
}

/// How imported records combine with the current collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImportMode {
    /// Append records whose id is not taken yet. Unassigned ids get fresh ones.
    #[default]
    Merge,
    /// Discard the current collection.
    Replace,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub added: usize,
    pub skipped: usize,
}

/// Ids touched and ignored by [`RecordStore::bulk_update`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkReport {
    pub updated: Vec<RecordId>,
    pub ignored: Vec<RecordId>,
}

pub struct RecordStore<S: KeyValueStore> {
    storage: S,
    config: StoreConfig,
    records: Arc<Vec<TechnologyRecord>>,
    high_water: RecordId,
    revision: u64,
    source: LoadSource,
    degraded: bool,
    #[cfg(feature = "emitter")]
    emitter: EventEmitter,
}

impl<S: KeyValueStore> RecordStore<S> {
    /// Load the collection from `storage`, falling back to the configured seed.
    ///
    /// The primary key is read first, then each legacy key. An unreadable or
    /// corrupt entry falls back to the seed. Seeded and migrated collections
    /// are written back under the primary key.
    pub fn open(storage: S, config: StoreConfig) -> Self {
        let (records, source, degraded) = load(&storage, &config);

        let mut store = RecordStore {
            storage,
            config,
            records: Arc::new(Vec::new()),
            high_water: RecordId::UNASSIGNED,
            revision: 0,
            source,
            degraded,
            #[cfg(feature = "emitter")]
            emitter: EventEmitter::new(),
        };
        store.records = Arc::new(store.assign_ids(records));

        info!(
            "opened technology store under {:?} with {} records ({:?})",
            store.config.key,
            store.records.len(),
            store.source
        );
        if store.source != LoadSource::Stored && !store.degraded {
            store.persist();
        }
        store
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn source(&self) -> &LoadSource {
        &self.source
    }

    /// Number of committed mutations since open.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// True while the last storage access failed.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Snapshot of the collection in insertion order.
    pub fn list(&self) -> Arc<Vec<TechnologyRecord>> {
        Arc::clone(&self.records)
    }

    pub fn records(&self) -> &[TechnologyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<&TechnologyRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn require(&self, id: RecordId) -> Result<&TechnologyRecord, TrackerError> {
        self.get(id).ok_or(TrackerError::NotFound(id))
    }

    pub fn stats(&self) -> Stats {
        compute_stats(&self.records)
    }

    /// Append a new record with a freshly allocated id.
    pub fn add(&mut self, draft: NewTechnology) -> Result<TechnologyRecord, TrackerError> {
        let mut added = self.insert_drafts(vec![draft])?;
        added.pop().ok_or_else(TrackerError::empty_title)
    }

    /// Shallow-merge `patch` into the record with `id`.
    ///
    /// Returns `Ok(None)` when no such record exists. A patch that would blank
    /// the title is rejected without touching the collection.
    pub fn update(
        &mut self,
        id: RecordId,
        patch: &RecordPatch,
    ) -> Result<Option<TechnologyRecord>, TrackerError> {
        if patch.clears_title() {
            return Err(TrackerError::empty_title());
        }
        if patch.is_empty() {
            return Ok(self.get(id).cloned());
        }
        Ok(self.modify(id, |record| patch.apply_to(record)))
    }

    pub fn set_status(&mut self, id: RecordId, status: Status) -> Option<TechnologyRecord> {
        self.modify(id, |record| record.status = status)
    }

    /// Advance the record to the next status in the cycle.
    pub fn cycle_status(&mut self, id: RecordId) -> Option<TechnologyRecord> {
        self.modify(id, |record| record.status = record.status.next())
    }

    /// Replace the notes. Blank text clears them.
    pub fn update_notes(&mut self, id: RecordId, notes: &str) -> Option<TechnologyRecord> {
        let notes = (!notes.trim().is_empty()).then(|| notes.to_string());
        self.modify(id, |record| record.notes = notes)
    }

    /// Remove the record with `id`. Returns false if it was not there.
    pub fn delete(&mut self, id: RecordId) -> bool {
        let Some(position) = self.records.iter().position(|record| record.id == id) else {
            debug!("delete of absent technology {} ignored", id);
            return false;
        };
        Arc::make_mut(&mut self.records).remove(position);
        self.commit(ChangeKind::Removed, vec![id]);
        true
    }

    /// Set every record to `completed`. Returns how many changed.
    pub fn mark_all_completed(&mut self) -> usize {
        self.set_all_statuses(Status::Completed)
    }

    /// Set every record back to `not-started`. Returns how many changed.
    pub fn reset_all_statuses(&mut self) -> usize {
        self.set_all_statuses(Status::NotStarted)
    }

    /// Remove every record. Allocated ids stay retired.
    pub fn clear(&mut self) -> usize {
        let removed = self.records.len();
        if removed > 0 {
            self.records = Arc::new(Vec::new());
            self.commit(ChangeKind::Cleared, Vec::new());
        }
        removed
    }

    pub fn bulk_update(
        &mut self,
        ids: &[RecordId],
        patch: &RecordPatch,
    ) -> Result<BulkReport, TrackerError> {
        let BulkOutcome {
            records,
            updated,
            ignored,
        } = bulk::bulk_update(&self.records, ids, patch)?;

        if !ignored.is_empty() {
            debug!("bulk update ignored unknown ids {:?}", ignored);
        }
        if !updated.is_empty() {
            self.records = Arc::new(records);
            self.commit(ChangeKind::BulkUpdated, updated.clone());
        }
        Ok(BulkReport { updated, ignored })
    }

    /// Combine already-decoded records with the collection.
    pub fn import(&mut self, records: Vec<TechnologyRecord>, mode: ImportMode) -> ImportSummary {
        let summary = match mode {
            ImportMode::Replace => {
                let received = records.len();
                let records = self.assign_ids(records);
                let added = records.len();
                self.records = Arc::new(records);
                ImportSummary { added, skipped: received - added }
            }
            ImportMode::Merge => {
                let mut taken: HashSet<RecordId> =
                    self.records.iter().map(|record| record.id).collect();
                let mut summary = ImportSummary::default();
                let mut merged = Vec::new();
                for mut record in records {
                    if !record.id.is_assigned() {
                        match self.allocate_id() {
                            Some(id) => record.id = id,
                            None => {
                                warn!("import skipped {:?}: record ids exhausted", record.title);
                                summary.skipped += 1;
                                continue;
                            }
                        }
                    } else if taken.contains(&record.id) {
                        debug!("import skipped colliding id {}", record.id);
                        summary.skipped += 1;
                        continue;
                    }
                    self.raise_high_water(record.id);
                    taken.insert(record.id);
                    merged.push(record);
                    summary.added += 1;
                }
                if !merged.is_empty() {
                    Arc::make_mut(&mut self.records).extend(merged);
                }
                summary
            }
        };

        if summary.added > 0 || mode == ImportMode::Replace {
            self.commit(ChangeKind::Imported, Vec::new());
        }
        info!(
            "imported {} technologies ({} skipped, {:?})",
            summary.added, summary.skipped, mode
        );
        summary
    }

    /// Decode `text` and import it. A payload without a single valid entry is
    /// rejected and leaves the collection unchanged.
    pub fn import_json(&mut self, text: &str, mode: ImportMode) -> Result<ImportSummary, TrackerError> {
        let records = codec::import_json(text)?;
        if records.is_empty() {
            return Err(FormatError::NoValidEntries.into());
        }
        Ok(self.import(records, mode))
    }

    pub fn export_json(&self) -> Result<String, FormatError> {
        codec::export_json(&self.records)
    }

    /// Add every technology of a fetched roadmap in one commit.
    pub fn apply_roadmap(&mut self, roadmap: Roadmap) -> Result<Vec<TechnologyRecord>, TrackerError> {
        info!(
            "applying roadmap {} with {} technologies",
            roadmap.source,
            roadmap.technologies.len()
        );
        self.insert_drafts(roadmap.technologies)
    }

    /// A random record that has not been started yet.
    pub fn pick_random_not_started<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&TechnologyRecord> {
        let candidates: Vec<&TechnologyRecord> = self
            .records
            .iter()
            .filter(|record| record.status == Status::NotStarted)
            .collect();
        candidates.choose(rng).copied()
    }

    /// Write the collection to storage now, reporting any failure.
    pub fn flush(&mut self) -> Result<(), TrackerError> {
        let result = self.write_through();
        self.degraded = result.is_err();
        result
    }

    /// Register a change listener. Returns its id for [`RecordStore::unsubscribe`].
    #[cfg(feature = "emitter")]
    pub fn subscribe<F>(&mut self, listener: F) -> String
    where
        F: Fn(StoreChange) + Send + Sync + 'static,
    {
        self.emitter.on(CHANGE_EVENT, listener)
    }

    #[cfg(feature = "emitter")]
    pub fn unsubscribe(&mut self, listener_id: &str) -> bool {
        self.emitter.remove_listener(listener_id).is_some()
    }

    fn insert_drafts(&mut self, drafts: Vec<NewTechnology>) -> Result<Vec<TechnologyRecord>, TrackerError> {
        if drafts.iter().any(|draft| !draft.has_title()) {
            return Err(TrackerError::empty_title());
        }
        if drafts.is_empty() {
            return Ok(Vec::new());
        }

        let start = self.high_water;
        let ids: Option<Vec<RecordId>> = drafts.iter().map(|_| self.allocate_id()).collect();
        let Some(ids) = ids else {
            self.high_water = start;
            return Err(TrackerError::ids_exhausted());
        };

        let now = Utc::now();
        let added: Vec<TechnologyRecord> = drafts
            .into_iter()
            .zip(&ids)
            .map(|(draft, &id)| draft.into_record(id, now))
            .collect();

        Arc::make_mut(&mut self.records).extend(added.iter().cloned());
        self.commit(ChangeKind::Added, ids);
        Ok(added)
    }

    fn modify<F>(&mut self, id: RecordId, change: F) -> Option<TechnologyRecord>
    where
        F: FnOnce(&mut TechnologyRecord),
    {
        let position = self.records.iter().position(|record| record.id == id)?;
        let record = &mut Arc::make_mut(&mut self.records)[position];
        change(record);
        record.id = id;
        let updated = record.clone();
        self.commit(ChangeKind::Updated, vec![id]);
        Some(updated)
    }

    fn set_all_statuses(&mut self, status: Status) -> usize {
        let changed: Vec<RecordId> = self
            .records
            .iter()
            .filter(|record| record.status != status)
            .map(|record| record.id)
            .collect();
        if changed.is_empty() {
            return 0;
        }
        for record in Arc::make_mut(&mut self.records).iter_mut() {
            record.status = status;
        }
        let count = changed.len();
        self.commit(ChangeKind::BulkUpdated, changed);
        count
    }

    fn allocate_id(&mut self) -> Option<RecordId> {
        let id = self.high_water.next()?;
        self.high_water = id;
        Some(id)
    }

    fn raise_high_water(&mut self, id: RecordId) {
        if id > self.high_water {
            self.high_water = id;
        }
    }

    /// Keep the first record per id and give unassigned or duplicate ids fresh
    /// ones. Records that cannot be numbered any more are dropped.
    fn assign_ids(&mut self, records: Vec<TechnologyRecord>) -> Vec<TechnologyRecord> {
        for record in &records {
            self.raise_high_water(record.id);
        }
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(records.len());
        for mut record in records {
            if !record.id.is_assigned() || !seen.insert(record.id) {
                let Some(fresh) = self.allocate_id() else {
                    warn!("dropped {:?}: record ids exhausted", record.title);
                    continue;
                };
                if record.id.is_assigned() {
                    warn!("duplicate technology id {} renumbered to {}", record.id, fresh);
                }
                record.id = fresh;
                seen.insert(fresh);
            }
            kept.push(record);
        }
        kept
    }

    fn commit(&mut self, kind: ChangeKind, ids: Vec<RecordId>) {
        self.revision += 1;
        self.persist();

        let change = StoreChange {
            kind,
            ids: ids.into_iter().map(RecordId::get).collect(),
            revision: self.revision,
            total: self.records.len(),
        };
        debug!("{:?} committed at revision {}", change.kind, change.revision);
        self.notify(change);
    }

    fn persist(&mut self) {
        match self.write_through() {
            Ok(()) => {
                if self.degraded {
                    info!("storage writes recovered for {:?}", self.config.key);
                }
                self.degraded = false;
            }
            Err(err) => {
                error!(
                    "could not persist technologies under {:?}, keeping them in memory: {}",
                    self.config.key, err
                );
                self.degraded = true;
            }
        }
    }

    fn write_through(&self) -> Result<(), TrackerError> {
        let raw = codec::to_storage_json(&self.records)?;
        self.storage.set(&self.config.key, &raw)?;
        Ok(())
    }

    #[cfg(feature = "emitter")]
    fn notify(&mut self, change: StoreChange) {
        self.emitter.emit(CHANGE_EVENT, change);
    }

    #[cfg(not(feature = "emitter"))]
    fn notify(&mut self, _change: StoreChange) {}
}

/// Read the collection, returning it with its source and whether storage failed.
fn load<S: KeyValueStore>(storage: &S, config: &StoreConfig) -> (Vec<TechnologyRecord>, LoadSource, bool) {
    match storage.get(&config.key) {
        Ok(Some(raw)) => {
            return match codec::import_json(&raw) {
                Ok(records) => (records, LoadSource::Stored, false),
                Err(err) => {
                    warn!("stored technologies under {:?} are corrupt, using seed: {}", config.key, err);
                    (config.seed.clone(), LoadSource::Seed, false)
                }
            };
        }
        Ok(None) => {}
        Err(err) => {
            error!("could not read technologies under {:?}, using seed: {}", config.key, err);
            return (config.seed.clone(), LoadSource::Seed, true);
        }
    }

    for key in &config.legacy_keys {
        match storage.get(key) {
            Ok(Some(raw)) => match codec::import_json(&raw) {
                Ok(records) => {
                    info!("migrating {} technologies from legacy key {:?}", records.len(), key);
                    return (records, LoadSource::Legacy(key.clone()), false);
                }
                Err(err) => warn!("ignoring corrupt legacy key {:?}: {}", key, err),
            },
            Ok(None) => {}
            Err(err) => warn!("could not read legacy key {:?}: {}", key, err),
        }
    }

    info!("no stored technologies, starting from seed");
    (config.seed.clone(), LoadSource::Seed, false)
}
