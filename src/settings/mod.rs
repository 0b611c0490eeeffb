//! Settings - the flat configuration object kept next to the collection.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::record::{Category, NewTechnology, Priority};
use crate::storage::{KeyValueStore, StorageError, SETTINGS_KEY};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
}

/// User preferences. Missing fields in a stored document take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub theme: Theme,
    pub language: String,
    pub notifications: bool,
    pub auto_save: bool,
    pub default_category: Category,
    pub default_priority: Priority,
    pub show_completed: bool,
    pub export_format: ExportFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            theme: Theme::Light,
            language: "ru".to_string(),
            notifications: true,
            auto_save: true,
            default_category: Category::from("frontend"),
            default_priority: Priority::Medium,
            show_completed: true,
            export_format: ExportFormat::Json,
        }
    }
}

impl Settings {
    /// Read settings from `store`, falling back to defaults when the entry is
    /// absent, unreadable or corrupt.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Settings {
        match store.get(SETTINGS_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!("ignoring corrupt settings entry: {}", err);
                Settings::default()
            }),
            Ok(None) => Settings::default(),
            Err(err) => {
                warn!("could not read settings, using defaults: {}", err);
                Settings::default()
            }
        }
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &S) -> Result<(), StorageError> {
        let raw = serde_json::to_string(self)?;
        store.set(SETTINGS_KEY, &raw)
    }

    /// Overwrite the stored settings with defaults and return them.
    pub fn reset<S: KeyValueStore + ?Sized>(store: &S) -> Result<Settings, StorageError> {
        let defaults = Settings::default();
        defaults.save(store)?;
        Ok(defaults)
    }

    /// Fill the default category and priority into a draft that has none.
    pub fn apply_defaults(&self, mut draft: NewTechnology) -> NewTechnology {
        if draft.category.is_none() {
            draft.category = Some(self.default_category.clone());
        }
        if draft.priority.is_none() {
            draft.priority = Some(self.default_priority);
        }
        draft
    }
}
