//! Bulk Mutator - one patch applied to many records by id.

use std::collections::HashSet;

use thiserror::Error;

use crate::record::{RecordId, RecordPatch, TechnologyRecord};

/// Reasons a bulk update is refused before touching any record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BulkError {
    #[error("no technologies selected")]
    EmptySelection,
    #[error("no fields selected for update")]
    EmptyPatch,
    #[error("patch would clear the title")]
    BlankTitle,
}

/// Result of a bulk update: the new collection plus which ids were touched.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkOutcome {
    pub records: Vec<TechnologyRecord>,
    /// Updated ids, in collection order.
    pub updated: Vec<RecordId>,
    /// Requested ids with no matching record, in request order.
    pub ignored: Vec<RecordId>,
}

/// Shallow-merge `patch` into every record whose id is in `ids`.
///
/// The input slice is never modified; the merged collection is returned in
/// `BulkOutcome::records`. Unknown ids are reported in `ignored`, not as errors.
pub fn bulk_update(
    records: &[TechnologyRecord],
    ids: &[RecordId],
    patch: &RecordPatch,
) -> Result<BulkOutcome, BulkError> {
    if ids.is_empty() {
        return Err(BulkError::EmptySelection);
    }
    if patch.is_empty() {
        return Err(BulkError::EmptyPatch);
    }
    if patch.clears_title() {
        return Err(BulkError::BlankTitle);
    }

    let selected: HashSet<RecordId> = ids.iter().copied().collect();
    let mut updated = Vec::new();
    let records: Vec<TechnologyRecord> = records
        .iter()
        .map(|record| {
            let mut record = record.clone();
            if selected.contains(&record.id) {
                patch.apply_to(&mut record);
                updated.push(record.id);
            }
            record
        })
        .collect();

    let present: HashSet<RecordId> = updated.iter().copied().collect();
    let mut seen = HashSet::new();
    let ignored = ids
        .iter()
        .copied()
        .filter(|id| !present.contains(id) && seen.insert(*id))
        .collect();

    Ok(BulkOutcome {
        records,
        updated,
        ignored,
    })
}
