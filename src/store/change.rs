use serde::{Deserialize, Serialize};

/// Event name change notifications are emitted under.
pub const CHANGE_EVENT: &str = "technologies:changed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    Added,
    Updated,
    Removed,
    BulkUpdated,
    Imported,
    Cleared,
}

/// Notification sent to subscribers after a committed mutation.
///
/// `ids` are the raw record ids touched by the mutation; empty for whole-collection changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreChange {
    pub kind: ChangeKind,
    pub ids: Vec<u64>,
    pub revision: u64,
    pub total: usize,
}
