use crate::record::{Category, Difficulty, Priority, RecordId, Status, TechnologyRecord};
use crate::storage::{LEGACY_TECHNOLOGY_KEYS, TECHNOLOGIES_KEY};

/// Where a [`RecordStore`](super::RecordStore) keeps its collection and what
/// it starts from when nothing usable is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    pub key: String,
    /// Probed in order when `key` is absent. The first hit is migrated to `key`.
    pub legacy_keys: Vec<String>,
    pub seed: Vec<TechnologyRecord>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            key: TECHNOLOGIES_KEY.to_string(),
            legacy_keys: LEGACY_TECHNOLOGY_KEYS.iter().map(|key| key.to_string()).collect(),
            seed: seed_technologies(),
        }
    }
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_legacy_keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.legacy_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_seed(mut self, seed: Vec<TechnologyRecord>) -> Self {
        self.seed = seed;
        self
    }
}

fn seed_record(
    id: u64,
    title: &str,
    description: &str,
    category: &str,
    priority: Priority,
    status: Status,
) -> TechnologyRecord {
    TechnologyRecord {
        id: RecordId::new(id),
        title: title.to_string(),
        description: description.to_string(),
        category: Category::from(category),
        status,
        difficulty: None,
        priority: Some(priority),
        deadline: None,
        notes: None,
        resources: Vec::new(),
        created_at: None,
    }
}

/// The starter collection shown on first launch.
pub fn seed_technologies() -> Vec<TechnologyRecord> {
    let mut node = seed_record(
        2,
        "Node.js Basics",
        "Server-side JavaScript runtime and its module system",
        "backend",
        Priority::Medium,
        Status::InProgress,
    );
    node.notes = Some("Working through the event loop chapter".to_string());
    node.difficulty = Some(Difficulty::Intermediate);

    vec![
        seed_record(
            1,
            "React Components",
            "Function components, props and state",
            "frontend",
            Priority::High,
            Status::NotStarted,
        ),
        node,
        seed_record(
            3,
            "HTML & CSS",
            "Semantic markup, flexbox and grid layouts",
            "frontend",
            Priority::Low,
            Status::Completed,
        ),
        seed_record(
            4,
            "Express.js",
            "Routing and middleware for Node.js web servers",
            "backend",
            Priority::High,
            Status::NotStarted,
        ),
        seed_record(
            5,
            "Git & GitHub",
            "Branches, pull requests and code review",
            "tool",
            Priority::Medium,
            Status::Completed,
        ),
    ]
}
