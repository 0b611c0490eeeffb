//! Derived statistics - counts and percentages recomputed from a record slice.
//!
//! Everything here is a pure function of the records passed in.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::record::{Category, Priority, Status, TechnologyRecord};

/// Aggregate progress over a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub not_started: usize,
    pub percent_complete: u32,
    pub percent_in_progress: u32,
    pub percent_not_started: u32,
    pub by_category: BTreeMap<Category, usize>,
    /// Records without a priority are counted under `None`.
    pub by_priority: BTreeMap<Option<Priority>, usize>,
}

impl Stats {
    pub fn count(&self, status: Status) -> usize {
        match status {
            Status::NotStarted => self.not_started,
            Status::InProgress => self.in_progress,
            Status::Completed => self.completed,
        }
    }
}

/// Rounded percentage of `part` in `total`, half rounding up. Zero when `total` is zero.
pub fn percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let part = part as u64;
    let total = total as u64;
    ((part * 200 + total) / (total * 2)) as u32
}

pub fn compute_stats(records: &[TechnologyRecord]) -> Stats {
    let mut stats = Stats {
        total: records.len(),
        ..Default::default()
    };

    for record in records {
        match record.status {
            Status::NotStarted => stats.not_started += 1,
            Status::InProgress => stats.in_progress += 1,
            Status::Completed => stats.completed += 1,
        }
        *stats
            .by_category
            .entry(record.category.clone())
            .or_insert(0) += 1;
        *stats.by_priority.entry(record.priority).or_insert(0) += 1;
    }

    stats.percent_complete = percent(stats.completed, stats.total);
    stats.percent_in_progress = percent(stats.in_progress, stats.total);
    stats.percent_not_started = percent(stats.not_started, stats.total);
    stats
}

/// Completion of a single category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryProgress {
    pub category: Category,
    pub completed: usize,
    pub total: usize,
    pub percent: u32,
}

/// Per-category completion, in first-seen category order.
pub fn category_progress(records: &[TechnologyRecord]) -> Vec<CategoryProgress> {
    let mut progress: Vec<CategoryProgress> = Vec::new();
    for record in records {
        let position = match progress
            .iter()
            .position(|entry| entry.category == record.category)
        {
            Some(position) => position,
            None => {
                progress.push(CategoryProgress {
                    category: record.category.clone(),
                    completed: 0,
                    total: 0,
                    percent: 0,
                });
                progress.len() - 1
            }
        };
        let entry = &mut progress[position];
        entry.total += 1;
        if record.is_completed() {
            entry.completed += 1;
        }
    }

    for entry in &mut progress {
        entry.percent = percent(entry.completed, entry.total);
    }
    progress
}

/// Status with the most records. Ties go to the earlier status in
/// `not-started, in-progress, completed` order; None for an empty collection.
pub fn dominant_status(stats: &Stats) -> Option<Status> {
    if stats.total == 0 {
        return None;
    }
    Status::ALL
        .into_iter()
        .rev()
        .max_by_key(|status| stats.count(*status))
}

/// Records still open whose deadline is before `today`, in collection order.
pub fn overdue(records: &[TechnologyRecord], today: NaiveDate) -> Vec<&TechnologyRecord> {
    records
        .iter()
        .filter(|record| record.is_overdue(today))
        .collect()
}
