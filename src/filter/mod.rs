//! Filter/Search - synchronous, side-effect-free views over a record slice.
//!
//! ## Example
//!
//! ```ignore
//! use tech_tracker::{filter_records, RecordQuery, SortKey, StatusFilter};
//!
//! let hits = filter_records(store.records(), "react");
//!
//! let query = RecordQuery::new()
//!     .text("script")
//!     .status(StatusFilter::Only(Status::InProgress));
//! let view = query.sorted_by(SortKey::Priority).run(store.records());
//! ```

mod sequencer;

use std::cmp::Ordering;
use std::str::FromStr;

use crate::record::{Category, ParseEnumError, Status, TechnologyRecord};

pub use sequencer::{SearchSequencer, SearchTicket};

/// Records whose title, description or category contains `query`, ignoring case.
///
/// A blank query returns every record.
pub fn filter_records<'a>(records: &'a [TechnologyRecord], query: &str) -> Vec<&'a TechnologyRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records.iter().collect();
    }
    records
        .iter()
        .filter(|record| matches_text(record, &needle))
        .collect()
}

fn matches_text(record: &TechnologyRecord, needle: &str) -> bool {
    record.title.to_lowercase().contains(needle)
        || record.description.to_lowercase().contains(needle)
        || record.category.as_str().to_lowercase().contains(needle)
}

/// Status tab selection; `All` is the "show everything" sentinel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(Status),
}

impl StatusFilter {
    pub fn matches(self, status: Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == "all" {
            return Ok(StatusFilter::All);
        }
        s.parse().map(StatusFilter::Only)
    }
}

impl From<Status> for StatusFilter {
    fn from(status: Status) -> Self {
        StatusFilter::Only(status)
    }
}

pub fn filter_by_status(
    records: &[TechnologyRecord],
    filter: impl Into<StatusFilter>,
) -> Vec<&TechnologyRecord> {
    let filter = filter.into();
    records
        .iter()
        .filter(|record| filter.matches(record.status))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Title,
    Status,
    /// High first; records without a priority last.
    Priority,
    /// Earliest first; records without a deadline last.
    Deadline,
    CreatedAt,
}

/// Stable sort of a filtered view. Equal keys keep collection order.
pub fn sort_records(records: &mut [&TechnologyRecord], key: SortKey) {
    records.sort_by(|a, b| compare(a, b, key));
}

fn compare(a: &TechnologyRecord, b: &TechnologyRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        SortKey::Status => a.status.cmp(&b.status),
        SortKey::Priority => none_last(a.priority, b.priority),
        SortKey::Deadline => none_last(a.deadline, b.deadline),
        SortKey::CreatedAt => none_last(a.created_at, b.created_at),
    }
}

fn none_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Combined text, status and category selection with optional ordering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordQuery {
    text: String,
    status: StatusFilter,
    category: Option<Category>,
    sort: Option<SortKey>,
}

impl RecordQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn status(mut self, status: impl Into<StatusFilter>) -> Self {
        self.status = status.into();
        self
    }

    pub fn category(mut self, category: impl Into<Category>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn sorted_by(mut self, key: SortKey) -> Self {
        self.sort = Some(key);
        self
    }

    pub fn text_query(&self) -> &str {
        &self.text
    }

    pub fn run<'a>(&self, records: &'a [TechnologyRecord]) -> Vec<&'a TechnologyRecord> {
        let mut view: Vec<&TechnologyRecord> = filter_records(records, &self.text)
            .into_iter()
            .filter(|record| self.status.matches(record.status))
            .filter(|record| {
                self.category
                    .as_ref()
                    .map_or(true, |category| &record.category == category)
            })
            .collect();
        if let Some(key) = self.sort {
            sort_records(&mut view, key);
        }
        view
    }
}
