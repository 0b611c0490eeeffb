//! Import/Export Codec - JSON documents of the record collection.
//!
//! Three document shapes are written and all of them are read back:
//!
//! ```text
//! [ {record}, ... ]                                                  bare array
//! { "exportedAt", "totalTechnologies", "completed", "technologies" } export envelope
//! { "exportedAt", "settings", "technologies" }                       settings backup
//! ```
//!
//! Import is tolerant per entry: anything that is not an object with a
//! non-blank `title`, or that does not decode into a record, is dropped with a
//! warning. Only a payload that is not JSON, or whose top level holds no
//! record array, fails as a whole.

use chrono::{DateTime, NaiveDate, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::record::{Status, TechnologyRecord};
use crate::settings::Settings;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected an array of technologies, found {0}")]
    NotAnArray(&'static str),
    #[error("payload contains no valid technologies")]
    NoValidEntries,
}

/// Export document with summary counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEnvelope {
    pub exported_at: DateTime<Utc>,
    pub total_technologies: usize,
    pub completed: usize,
    pub technologies: Vec<TechnologyRecord>,
}

/// Settings-page backup: the collection plus the settings object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupEnvelope {
    pub exported_at: DateTime<Utc>,
    pub settings: Settings,
    pub technologies: Vec<TechnologyRecord>,
}

/// Which download an export file name is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Technologies,
    Backup,
}

pub fn export_filename(kind: ExportKind, date: NaiveDate) -> String {
    let date = date.format("%Y-%m-%d");
    match kind {
        ExportKind::Technologies => format!("technologies_{}.json", date),
        ExportKind::Backup => format!("tech-tracker-backup-{}.json", date),
    }
}

/// Pretty-printed bare array, fields in declaration order.
pub fn export_json(records: &[TechnologyRecord]) -> Result<String, FormatError> {
    Ok(serde_json::to_string_pretty(records)?)
}

pub fn export_envelope(
    records: &[TechnologyRecord],
    exported_at: DateTime<Utc>,
) -> Result<String, FormatError> {
    let envelope = ExportEnvelope {
        exported_at,
        total_technologies: records.len(),
        completed: records.iter().filter(|record| record.is_completed()).count(),
        technologies: records.to_vec(),
    };
    Ok(serde_json::to_string_pretty(&envelope)?)
}

pub fn export_backup(
    records: &[TechnologyRecord],
    settings: &Settings,
    exported_at: DateTime<Utc>,
) -> Result<String, FormatError> {
    let backup = BackupEnvelope {
        exported_at,
        settings: settings.clone(),
        technologies: records.to_vec(),
    };
    Ok(serde_json::to_string_pretty(&backup)?)
}

/// Compact form written to the key-value store after each mutation.
pub(crate) fn to_storage_json(records: &[TechnologyRecord]) -> Result<String, FormatError> {
    Ok(serde_json::to_string(records)?)
}

/// Parse any supported document and return its valid records in order.
pub fn import_json(text: &str) -> Result<Vec<TechnologyRecord>, FormatError> {
    let value: Value = serde_json::from_str(text)?;
    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(mut fields) => match fields.remove("technologies") {
            Some(Value::Array(entries)) => entries,
            _ => return Err(FormatError::NotAnArray("an object without a technologies array")),
        },
        other => return Err(FormatError::NotAnArray(kind_of(&other))),
    };

    Ok(entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| decode_entry(index, entry))
        .collect())
}

/// Settings carried by a backup document, if any.
pub fn import_settings(text: &str) -> Result<Option<Settings>, FormatError> {
    let value: Value = serde_json::from_str(text)?;
    match value {
        Value::Object(mut fields) => match fields.remove("settings") {
            Some(settings) => Ok(Some(serde_json::from_value(settings)?)),
            None => Ok(None),
        },
        _ => Ok(None),
    }
}

fn decode_entry(index: usize, entry: Value) -> Option<TechnologyRecord> {
    let Value::Object(mut fields) = entry else {
        warn!("dropping import entry {}: not an object", index);
        return None;
    };
    if !has_title(&fields) {
        warn!("dropping import entry {}: missing title", index);
        return None;
    }
    normalize_legacy(&mut fields);

    match serde_json::from_value(Value::Object(fields)) {
        Ok(record) => Some(record),
        Err(err) => {
            warn!("dropping import entry {}: {}", index, err);
            None
        }
    }
}

fn has_title(fields: &Map<String, Value>) -> bool {
    matches!(fields.get("title"), Some(Value::String(title)) if !title.trim().is_empty())
}

/// Fold the `isStudied` flag of older variants into `status`.
fn normalize_legacy(fields: &mut Map<String, Value>) {
    let studied = fields.remove("isStudied");
    let has_status = fields.get("status").is_some_and(|status| !status.is_null());
    if has_status {
        return;
    }
    if let Some(Value::Bool(studied)) = studied {
        fields.insert(
            "status".to_string(),
            Value::String(Status::from_studied(studied).as_str().to_string()),
        );
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
