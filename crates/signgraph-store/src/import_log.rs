//! Append-only audit records of finished import jobs.
//!
//! An [`ImportLog`] is written once when a job finishes and rewritten once
//! more by rollback, which empties `created_entities` so the job cannot be
//! rolled back twice.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::{EntityId, EntityKind, Result};

/// Identifier of an import job (and of its log).
pub type JobId = Uuid;

/// One entity created by a job, in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CreatedEntity {
    pub kind: EntityKind,
    pub id: EntityId,
}

/// A per-row failure or warning kept for operator review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowMessage {
    /// 1-based line number in the source file.
    pub line: u64,
    pub word_unit_id: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportCounters {
    /// Data rows read from the source, malformed ones included.
    pub rows_read: u64,
    /// Rows whose whole entity graph resolved.
    pub processed: u64,
    pub failed: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportLog {
    pub id: JobId,
    pub label: String,
    pub operator: String,
    pub timestamp: DateTime<Utc>,
    /// `true` unless a row failed; `false` after rollback.
    pub status: bool,
    pub summary: String,
    pub created_entities: Vec<CreatedEntity>,
    pub source_filename: String,
    pub language: String,
    pub counters: ImportCounters,
    #[serde(default)]
    pub errors: Vec<RowMessage>,
    #[serde(default)]
    pub warnings: Vec<RowMessage>,
    #[serde(default)]
    pub rolled_back_at: Option<DateTime<Utc>>,
}

impl ImportLog {
    pub fn is_rolled_back(&self) -> bool {
        self.rolled_back_at.is_some()
    }

    /// Number of created entities per kind.
    pub fn created_by_kind(&self) -> BTreeMap<EntityKind, usize> {
        let mut out = BTreeMap::new();
        for entity in &self.created_entities {
            *out.entry(entity.kind).or_insert(0) += 1;
        }
        out
    }
}

/// Storage for import logs.
pub trait ImportLogRepository: Send + Sync {
    /// Insert a new log or replace the one with the same id.
    fn save(&self, log: &ImportLog) -> Result<()>;

    fn load(&self, id: JobId) -> Result<Option<ImportLog>>;

    /// All logs, oldest first.
    fn list(&self) -> Result<Vec<ImportLog>>;
}

fn upsert_log(logs: &mut Vec<ImportLog>, log: &ImportLog) {
    match logs.iter_mut().find(|l| l.id == log.id) {
        Some(existing) => *existing = log.clone(),
        None => logs.push(log.clone()),
    }
}

// ============================================================================
// In-memory
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryImportLogs {
    logs: RwLock<Vec<ImportLog>>,
}

impl MemoryImportLogs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ImportLogRepository for MemoryImportLogs {
    fn save(&self, log: &ImportLog) -> Result<()> {
        upsert_log(&mut self.logs.write(), log);
        Ok(())
    }

    fn load(&self, id: JobId) -> Result<Option<ImportLog>> {
        Ok(self.logs.read().iter().find(|l| l.id == id).cloned())
    }

    fn list(&self) -> Result<Vec<ImportLog>> {
        Ok(self.logs.read().clone())
    }
}

// ============================================================================
// JSON file
// ============================================================================

/// All logs in one pretty-printed JSON array, rewritten on every save
/// (via a temporary file renamed into place).
#[derive(Debug)]
pub struct JsonImportLogs {
    path: PathBuf,
    logs: RwLock<Vec<ImportLog>>,
}

impl JsonImportLogs {
    pub fn open(path: &Path) -> Result<Self> {
        let logs = if path.exists() {
            let contents = fs::read_to_string(path)?;
            serde_json::from_str(&contents)?
        } else {
            Vec::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            logs: RwLock::new(logs),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_file(&self, logs: &[ImportLog]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(logs)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl ImportLogRepository for JsonImportLogs {
    fn save(&self, log: &ImportLog) -> Result<()> {
        let mut logs = self.logs.write();
        upsert_log(&mut logs, log);
        self.write_file(&logs)
    }

    fn load(&self, id: JobId) -> Result<Option<ImportLog>> {
        Ok(self.logs.read().iter().find(|l| l.id == id).cloned())
    }

    fn list(&self) -> Result<Vec<ImportLog>> {
        Ok(self.logs.read().clone())
    }
}
