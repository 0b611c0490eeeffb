//! Technology records - the canonical shape every stored or imported entry is
//! normalized into.
//!
//! ## Example
//!
//! ```ignore
//! use tech_tracker::{NewTechnology, Priority, Status};
//!
//! let draft = NewTechnology::new("Rust")
//!     .with_category("language")
//!     .with_priority(Priority::High)
//!     .with_status(Status::InProgress);
//!
//! let record = store.add(draft)?;
//! assert!(record.id.is_assigned());
//! ```

mod id;
mod patch;
mod status;

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub use id::RecordId;
pub use patch::RecordPatch;
pub use status::{Difficulty, ParseEnumError, Priority, Status};

/// Open set of category labels. Values are not validated; unknown labels are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    /// Labels offered by the entry forms.
    pub const KNOWN: [&'static str; 8] = [
        "frontend", "backend", "database", "devops", "mobile", "language", "tool", "other",
    ];

    pub fn new(label: impl Into<String>) -> Self {
        Category(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Category {
    fn default() -> Self {
        Category("other".to_string())
    }
}

impl From<&str> for Category {
    fn from(label: &str) -> Self {
        Category(label.to_string())
    }
}

impl From<String> for Category {
    fn from(label: String) -> Self {
        Category(label)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One tracked technology.
///
/// Field order is the export order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnologyRecord {
    #[serde(default)]
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "optional_date"
    )]
    pub deadline: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl TechnologyRecord {
    pub fn is_completed(&self) -> bool {
        self.status == Status::Completed
    }

    /// True when the deadline is strictly before `today` and the record is not completed.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_completed() && self.deadline.is_some_and(|deadline| deadline < today)
    }
}

/// Caller-supplied fields for a record that does not exist yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewTechnology {
    pub title: String,
    pub description: String,
    pub category: Option<Category>,
    pub status: Option<Status>,
    pub difficulty: Option<Difficulty>,
    pub priority: Option<Priority>,
    #[serde(deserialize_with = "optional_date")]
    pub deadline: Option<NaiveDate>,
    pub notes: Option<String>,
    pub resources: Vec<String>,
}

impl NewTechnology {
    pub fn new(title: impl Into<String>) -> Self {
        NewTechnology {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
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
        self.difficulty = Some(difficulty);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_resource(mut self, url: impl Into<String>) -> Self {
        self.resources.push(url.into());
        self
    }

    pub(crate) fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }

    /// Materialize the draft. `status` falls back to `not-started`, blank resources are dropped.
    pub(crate) fn into_record(self, id: RecordId, created_at: DateTime<Utc>) -> TechnologyRecord {
        TechnologyRecord {
            id,
            title: self.title,
            description: self.description,
            category: self.category.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            difficulty: self.difficulty,
            priority: self.priority,
            deadline: self.deadline,
            notes: self.notes,
            resources: self
                .resources
                .into_iter()
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty())
                .collect(),
            created_at: Some(created_at),
        }
    }
}

/// Deadlines arrive as `YYYY-MM-DD`, full RFC 3339 timestamps, or an empty string for "none".
pub(crate) fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|at| at.date_naive()))
        .map(Some)
        .map_err(serde::de::Error::custom)
}
