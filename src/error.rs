use thiserror::Error;

use crate::bulk::BulkError;
use crate::codec::FormatError;
use crate::record::RecordId;
use crate::storage::StorageError;

/// Errors surfaced by the record store.
///
/// Absent ids are not errors for update/delete; `NotFound` is only returned by
/// lookups that require the record to exist.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("invalid import payload: {0}")]
    Format(#[from] FormatError),
    #[error("technology {0} not found")]
    NotFound(RecordId),
    #[error("bulk update rejected: {0}")]
    Bulk(#[from] BulkError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl TrackerError {
    pub(crate) fn empty_title() -> Self {
        TrackerError::Validation("title must not be empty".to_string())
    }

    pub(crate) fn ids_exhausted() -> Self {
        TrackerError::Validation("record ids exhausted".to_string())
    }
}
