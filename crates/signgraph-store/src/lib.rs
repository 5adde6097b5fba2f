//! Signgraph Storage Layer
//!
//! Everything the importer reads from or writes to lives behind the traits in
//! this crate:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         SIGNGRAPH STORAGE                           │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │                                                                     │
//! │  ┌──────────┐     ┌───────────────┐     ┌──────────────────┐        │
//! │  │ Importer │────►│  EntityStore  │────►│  store.json      │        │
//! │  │ (upsert) │     │ (natural keys)│     │  (snapshot)      │        │
//! │  └──────────┘     └───────────────┘     └──────────────────┘        │
//! │       │                  ▲                                          │
//! │       │           ┌──────┴───────┐                                  │
//! │       │           │  Source      │  provisioned out-of-band         │
//! │       │           │  Repository  │                                  │
//! │       │           └──────────────┘                                  │
//! │       ▼                                                             │
//! │  ┌──────────────┐     ┌──────────────────┐                          │
//! │  │  ImportLog   │────►│ import_logs.json │  audit + rollback        │
//! │  │  Repository  │     └──────────────────┘                          │
//! │  └──────────────┘                                                   │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Features
//!
//! - **Natural keys**: every [`EntityKind`] declares the fields that identify it
//! - **Conflict signal**: duplicate natural keys surface as [`StoreError::Conflict`]
//! - **Audit log**: [`ImportLog`] records what a job created so it can be undone
//! - **Snapshots**: the in-memory store persists to a single JSON file

pub mod clock;
pub mod error;
pub mod import_log;
pub mod memory;
pub mod query;
pub mod source;


use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{Result, StoreError};
pub use import_log::{
    CreatedEntity, ImportCounters, ImportLog, ImportLogRepository, JobId, JsonImportLogs,
    MemoryImportLogs, RowMessage,
};
pub use memory::InMemoryStore;
pub use query::{Condition, Query, SortOrder};
pub use source::{Source, SourceRepository, StoreSources};

// ============================================================================
// Core Types
// ============================================================================

/// Opaque entity identifier assigned by the store.
pub type EntityId = u64;

/// Every kind of entity the importer knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Source,
    TaxonomyTerm,
    Sign,
    SignFunction,
    Word,
    WordMeaning,
    AnnotationPage,
    Label,
    SignInterpretation,
    WordUnit,
    WordMap,
}

impl EntityKind {
    pub const ALL: [EntityKind; 11] = [
        EntityKind::Source,
        EntityKind::TaxonomyTerm,
        EntityKind::Sign,
        EntityKind::SignFunction,
        EntityKind::Word,
        EntityKind::WordMeaning,
        EntityKind::AnnotationPage,
        EntityKind::Label,
        EntityKind::SignInterpretation,
        EntityKind::WordUnit,
        EntityKind::WordMap,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Source => "source",
            EntityKind::TaxonomyTerm => "taxonomy_term",
            EntityKind::Sign => "sign",
            EntityKind::SignFunction => "sign_function",
            EntityKind::Word => "word",
            EntityKind::WordMeaning => "word_meaning",
            EntityKind::AnnotationPage => "annotation_page",
            EntityKind::Label => "label",
            EntityKind::SignInterpretation => "sign_interpretation",
            EntityKind::WordUnit => "word_unit",
            EntityKind::WordMap => "word_map",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let norm = s.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|k| k.as_str() == norm)
    }

    /// Field names forming the natural key of this kind.
    ///
    /// Stores must reject a second record whose values for these fields equal
    /// an existing record's (absent fields compare as [`FieldValue::Null`]).
    pub fn natural_key(self) -> &'static [&'static str] {
        match self {
            EntityKind::Source => &["identifier"],
            EntityKind::TaxonomyTerm => &["vocabulary", "name"],
            EntityKind::Sign => &["sign_code", "language"],
            EntityKind::SignFunction => &["sign", "function_name"],
            EntityKind::Word => &["basic_form", "lexical_category", "language"],
            EntityKind::WordMeaning => &["word", "meaning_identifier", "language"],
            EntityKind::AnnotationPage => &["source", "page_number"],
            EntityKind::Label => &["annotation_page", "label_name"],
            EntityKind::SignInterpretation => &[
                "annotation_page",
                "label",
                "sign_function",
                "line_number",
                "phone",
            ],
            EntityKind::WordUnit => &["original_word_unit_identifier"],
            EntityKind::WordMap => &["sign_interpretation", "word_unit"],
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Null,
    Text(String),
    Int(i64),
    /// Reference to another entity.
    Ref(EntityId),
    /// Unordered set of references (e.g. the pages a word unit spans).
    RefSet(BTreeSet<EntityId>),
}

impl FieldValue {
    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Text(s.into())
    }

    pub fn opt_ref(id: Option<EntityId>) -> Self {
        id.map_or(FieldValue::Null, FieldValue::Ref)
    }

    pub fn opt_int(value: Option<i64>) -> Self {
        value.map_or(FieldValue::Null, FieldValue::Int)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_entity_id(&self) -> Option<EntityId> {
        match self {
            FieldValue::Ref(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_ref_set(&self) -> Option<&BTreeSet<EntityId>> {
        match self {
            FieldValue::RefSet(ids) => Some(ids),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => f.write_str("null"),
            FieldValue::Text(s) => write!(f, "{s:?}"),
            FieldValue::Int(v) => write!(f, "{v}"),
            FieldValue::Ref(id) => write!(f, "#{id}"),
            FieldValue::RefSet(ids) => {
                let parts: Vec<String> = ids.iter().map(|id| format!("#{id}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

/// Attribute map of a record.
pub type Fields = BTreeMap<String, FieldValue>;

/// Build a [`Fields`] map from `(name, value)` pairs.
pub fn fields<I, K>(pairs: I) -> Fields
where
    I: IntoIterator<Item = (K, FieldValue)>,
    K: Into<String>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

static NULL: FieldValue = FieldValue::Null;

/// A stored entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: EntityId,
    pub kind: EntityKind,
    pub fields: Fields,
}

impl Record {
    /// Field value, or `Null` when the field is absent.
    pub fn get(&self, name: &str) -> &FieldValue {
        self.fields.get(name).unwrap_or(&NULL)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).as_text()
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).as_int()
    }

    pub fn entity_ref(&self, name: &str) -> Option<EntityId> {
        self.get(name).as_entity_id()
    }

    pub fn ref_set(&self, name: &str) -> Option<&BTreeSet<EntityId>> {
        self.get(name).as_ref_set()
    }

    pub fn set(&mut self, name: &str, value: FieldValue) {
        self.fields.insert(name.to_string(), value);
    }

    /// Values of this record's natural-key fields, in declaration order.
    pub fn natural_key(&self) -> Vec<FieldValue> {
        natural_key_of(self.kind, &self.fields)
    }
}

/// Natural-key values of `kind` extracted from `fields`.
pub fn natural_key_of(kind: EntityKind, fields: &Fields) -> Vec<FieldValue> {
    kind.natural_key()
        .iter()
        .map(|name| fields.get(*name).cloned().unwrap_or(FieldValue::Null))
        .collect()
}

/// Human-readable rendering of a natural key, used in error messages.
pub fn display_key(kind: EntityKind, values: &[FieldValue]) -> String {
    kind.natural_key()
        .iter()
        .zip(values)
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Entity Store
// ============================================================================

/// Generic entity persistence used by the importer.
///
/// Implementations must signal natural-key violations on `create`/`update`
/// with [`StoreError::Conflict`] so callers can tell an insert race apart from
/// any other failure.
pub trait EntityStore: Send + Sync {
    /// All records matching `query`.
    fn find(&self, query: &Query) -> Result<Vec<Record>>;

    /// Load a record by kind and id.
    fn load(&self, kind: EntityKind, id: EntityId) -> Result<Option<Record>>;

    /// Persist a new record and return it with its assigned id.
    fn create(&self, kind: EntityKind, fields: Fields) -> Result<Record>;

    /// Replace the fields of an existing record.
    fn update(&self, record: &Record) -> Result<()>;

    /// Insert `target` into the reference set `field` of a record, atomically.
    ///
    /// Returns `false` if the set already held `target`. A missing or null
    /// field starts as an empty set. `field` must not be part of the natural key.
    fn add_ref(
        &self,
        kind: EntityKind,
        id: EntityId,
        field: &str,
        target: EntityId,
    ) -> Result<bool>;

    /// Delete a record. Returns [`StoreError::NotFound`] if it does not exist.
    fn delete(&self, kind: EntityKind, id: EntityId) -> Result<()>;

    /// First record matching `query`, if any.
    fn find_one(&self, query: &Query) -> Result<Option<Record>> {
        let limited = query.clone().range(0, 1);
        Ok(self.find(&limited)?.into_iter().next())
    }

    /// Number of records of `kind`.
    fn count(&self, kind: EntityKind) -> Result<usize> {
        Ok(self.find(&Query::new(kind))?.len())
    }
}

// ============================================================================
// Storage Configuration
// ============================================================================

/// Where the on-disk state of a signgraph installation lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Entity store snapshot
    pub store_path: PathBuf,
    /// Import audit log
    pub import_log_path: PathBuf,
    /// Persisted state of an in-progress import job
    pub job_state_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("./signgraph/store.json"),
            import_log_path: PathBuf::from("./signgraph/import_logs.json"),
            job_state_path: PathBuf::from("./signgraph/job_state.json"),
        }
    }
}

impl StorageConfig {
    /// Standard file layout under `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            store_path: dir.join("store.json"),
            import_log_path: dir.join("import_logs.json"),
            job_state_path: dir.join("job_state.json"),
        }
    }
}

// ============================================================================
// Storage
// ============================================================================

/// The entity store and the import log, opened together from one config.
pub struct Storage {
    config: StorageConfig,
    store: InMemoryStore,
    logs: JsonImportLogs,
}

impl Storage {
    /// Open (or initialise) storage at the configured paths.
    pub fn open(config: StorageConfig) -> Result<Self> {
        let store = InMemoryStore::open(&config.store_path)?;
        let logs = JsonImportLogs::open(&config.import_log_path)?;
        Ok(Self {
            config,
            store,
            logs,
        })
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub fn store(&self) -> &InMemoryStore {
        &self.store
    }

    pub fn logs(&self) -> &JsonImportLogs {
        &self.logs
    }

    /// Write the entity store snapshot to disk.
    ///
    /// The import log persists itself on every save and needs no flush.
    pub fn flush(&self) -> Result<()> {
        self.store.save(&self.config.store_path)
    }
}

// ============================================================================
// Convenience Functions
// ============================================================================

/// Open storage using the standard layout under `data_dir`.
pub fn open_storage(data_dir: impl AsRef<Path>) -> Result<Storage> {
    Storage::open(StorageConfig::in_dir(data_dir.as_ref()))
}
