use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::{optional_date, Category, Difficulty, Priority, Status, TechnologyRecord};

/// Partial update shallow-merged into a record. `None` fields are left untouched.
///
/// The optional record fields take a nested option: `Some(None)` clears the
/// value, which JSON spells as `null` (or `""` for the deadline). The legacy
/// `isStudied` flag is folded into `status` unless `status` is present too.
///
/// There is no `id` field: a record's identity never changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawPatch")]
pub struct RecordPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Option<Difficulty>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Option<Priority>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<String>>,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawPatch {
    title: Option<String>,
    description: Option<String>,
    category: Option<Category>,
    status: Option<Status>,
    is_studied: Option<bool>,
    #[serde(deserialize_with = "present")]
    difficulty: Option<Option<Difficulty>>,
    #[serde(deserialize_with = "present")]
    priority: Option<Option<Priority>>,
    #[serde(deserialize_with = "present_date")]
    deadline: Option<Option<NaiveDate>>,
    #[serde(deserialize_with = "present")]
    notes: Option<Option<String>>,
    resources: Option<Vec<String>>,
}

impl From<RawPatch> for RecordPatch {
    fn from(raw: RawPatch) -> Self {
        RecordPatch {
            title: raw.title,
            description: raw.description,
            category: raw.category,
            status: raw.status.or(raw.is_studied.map(Status::from_studied)),
            difficulty: raw.difficulty,
            priority: raw.priority,
            deadline: raw.deadline,
            notes: raw.notes,
            resources: raw.resources,
        }
    }
}

/// A field that is present, even as `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn present_date<'de, D>(deserializer: D) -> Result<Option<Option<NaiveDate>>, D::Error>
where
    D: Deserializer<'de>,
{
    optional_date(deserializer).map(Some)
}

impl RecordPatch {
    pub fn new() -> Self {
        RecordPatch::default()
    }

    pub fn status(status: Status) -> Self {
        RecordPatch {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<Category>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(Some(difficulty));
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(Some(priority));
        self
    }

    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(Some(deadline));
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(Some(notes.into()));
        self
    }

    pub fn clear_difficulty(mut self) -> Self {
        self.difficulty = Some(None);
        self
    }

    pub fn clear_priority(mut self) -> Self {
        self.priority = Some(None);
        self
    }

    pub fn clear_deadline(mut self) -> Self {
        self.deadline = Some(None);
        self
    }

    pub fn clear_notes(mut self) -> Self {
        self.notes = Some(None);
        self
    }

    pub fn with_resources(mut self, resources: Vec<String>) -> Self {
        self.resources = Some(resources);
        self
    }

    /// True when the patch carries no recognized field.
    pub fn is_empty(&self) -> bool {
        self == &RecordPatch::default()
    }

    /// A patch may not blank out the title.
    pub fn clears_title(&self) -> bool {
        self.title
            .as_deref()
            .is_some_and(|title| title.trim().is_empty())
    }

    pub fn apply_to(&self, record: &mut TechnologyRecord) {
        if let Some(title) = &self.title {
            record.title = title.clone();
        }
        if let Some(description) = &self.description {
            record.description = description.clone();
        }
        if let Some(category) = &self.category {
            record.category = category.clone();
        }
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(difficulty) = self.difficulty {
            record.difficulty = difficulty;
        }
        if let Some(priority) = self.priority {
            record.priority = priority;
        }
        if let Some(deadline) = self.deadline {
            record.deadline = deadline;
        }
        if let Some(notes) = &self.notes {
            record.notes = notes.clone();
        }
        if let Some(resources) = &self.resources {
            record.resources = resources.clone();
        }
    }
}
