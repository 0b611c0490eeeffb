mod auth;
mod bulk;
mod codec;
mod error;
mod filter;
mod record;
mod settings;
mod stats;
mod storage;
mod store;
mod tasks;

pub use auth::{current_user, login, logout, AuthError, Landing, Session};
pub use bulk::{bulk_update, BulkError, BulkOutcome};
pub use codec::{
    export_backup, export_envelope, export_filename, export_json, import_json, import_settings,
    BackupEnvelope, ExportEnvelope, ExportKind, FormatError,
};
pub use error::TrackerError;
pub use filter::{
    filter_by_status, filter_records, sort_records, RecordQuery, SearchSequencer, SearchTicket,
    SortKey, StatusFilter,
};
pub use record::{
    Category, Difficulty, NewTechnology, ParseEnumError, Priority, RecordId, RecordPatch, Status,
    TechnologyRecord,
};
pub use settings::{ExportFormat, Settings, Theme};
pub use stats::{
    category_progress, compute_stats, dominant_status, overdue, percent, CategoryProgress, Stats,
};
pub use storage::{
    FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore, StorageError,
    LEGACY_TECHNOLOGY_KEYS, SETTINGS_KEY, TECHNOLOGIES_KEY,
};
pub use store::{
    seed_technologies, BulkReport, ChangeKind, ImportMode, ImportSummary, LoadSource,
    RecordStore, StoreChange, StoreConfig, CHANGE_EVENT,
};
pub use tasks::{
    additional_resources, fetch_additional_resources, fetch_roadmap, roadmap_fixture,
    CancellationToken, DeferredTask, ResourceLink, Roadmap, TaskError,
};
