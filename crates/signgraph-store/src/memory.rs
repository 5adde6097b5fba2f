//! In-memory entity store with natural-key enforcement and JSON snapshots.
//!
//! All tables sit behind one `RwLock`; `create` checks the natural-key index
//! and inserts under the same write guard, so two racing creators of the same
//! key see exactly one success and one [`StoreError::Conflict`]. Reference-set
//! appends (`add_ref`) take the same guard, so concurrent appends all land.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::{
    display_key, natural_key_of, EntityId, EntityKind, EntityStore, FieldValue, Fields, Query,
    Record, Result, StoreError,
};

type KeyIndex = HashMap<(EntityKind, Vec<FieldValue>), EntityId>;

#[derive(Debug, Default)]
struct Tables {
    next_id: EntityId,
    records: HashMap<EntityKind, BTreeMap<EntityId, Record>>,
    unique: KeyIndex,
}

impl Tables {
    fn get(&self, kind: EntityKind, id: EntityId) -> Option<&Record> {
        self.records.get(&kind)?.get(&id)
    }

    fn conflict(kind: EntityKind, key: &[FieldValue]) -> StoreError {
        StoreError::Conflict {
            kind,
            key: display_key(kind, key),
        }
    }
}

/// On-disk form of the store.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    next_id: EntityId,
    records: Vec<Record>,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a snapshot from `path`, or start empty if the file does not exist.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let file = fs::File::open(path)?;
        let snapshot: Snapshot = serde_json::from_reader(BufReader::new(file))?;
        let store = Self::from_snapshot(snapshot)?;
        tracing::debug!(path = %path.display(), records = store.len(), "opened entity store");
        Ok(store)
    }

    fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        let mut tables = Tables {
            next_id: snapshot.next_id,
            ..Tables::default()
        };
        for record in snapshot.records {
            let key = record.natural_key();
            if tables.unique.contains_key(&(record.kind, key.clone())) {
                return Err(Tables::conflict(record.kind, &key));
            }
            tables.next_id = tables.next_id.max(record.id);
            tables.unique.insert((record.kind, key), record.id);
            tables
                .records
                .entry(record.kind)
                .or_default()
                .insert(record.id, record);
        }
        Ok(Self {
            tables: RwLock::new(tables),
        })
    }

    /// Write a snapshot to `path` (via a temporary file renamed into place).
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let snapshot = {
            let tables = self.tables.read();
            let mut records: Vec<Record> = tables
                .records
                .values()
                .flat_map(|t| t.values().cloned())
                .collect();
            records.sort_by_key(|r| r.id);
            Snapshot {
                next_id: tables.next_id,
                records,
            }
        };

        let tmp = path.with_extension("json.tmp");
        {
            let mut out = BufWriter::new(fs::File::create(&tmp)?);
            serde_json::to_writer(&mut out, &snapshot)?;
            out.flush()?;
        }
        fs::rename(&tmp, path)?;
        tracing::debug!(path = %path.display(), records = snapshot.records.len(), "saved entity store");
        Ok(())
    }

    /// Total number of records across all kinds.
    pub fn len(&self) -> usize {
        self.tables.read().records.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Natural key bound by `Eq` conditions on every key field, if the query has them.
fn bound_natural_key(query: &Query) -> Option<Vec<FieldValue>> {
    query
        .kind
        .natural_key()
        .iter()
        .map(|field| query.eq_value(field).cloned())
        .collect()
}

impl EntityStore for InMemoryStore {
    fn find(&self, query: &Query) -> Result<Vec<Record>> {
        let tables = self.tables.read();
        let Some(table) = tables.records.get(&query.kind) else {
            return Ok(Vec::new());
        };

        if let Some(key) = bound_natural_key(query) {
            let hit = tables
                .unique
                .get(&(query.kind, key))
                .and_then(|id| table.get(id))
                .cloned();
            return Ok(query.apply(hit));
        }

        Ok(query.apply(table.values().filter(|r| query.matches(r)).cloned()))
    }

    fn load(&self, kind: EntityKind, id: EntityId) -> Result<Option<Record>> {
        Ok(self.tables.read().get(kind, id).cloned())
    }

    fn create(&self, kind: EntityKind, fields: Fields) -> Result<Record> {
        let mut tables = self.tables.write();
        let key = natural_key_of(kind, &fields);
        if tables.unique.contains_key(&(kind, key.clone())) {
            return Err(Tables::conflict(kind, &key));
        }

        tables.next_id += 1;
        let record = Record {
            id: tables.next_id,
            kind,
            fields,
        };
        tables.unique.insert((kind, key), record.id);
        tables
            .records
            .entry(kind)
            .or_default()
            .insert(record.id, record.clone());
        Ok(record)
    }

    fn update(&self, record: &Record) -> Result<()> {
        let mut tables = self.tables.write();
        let old_key = match tables.get(record.kind, record.id) {
            Some(existing) => existing.natural_key(),
            None => {
                return Err(StoreError::NotFound {
                    kind: record.kind,
                    id: record.id,
                })
            }
        };

        let new_key = record.natural_key();
        if old_key != new_key {
            if tables.unique.contains_key(&(record.kind, new_key.clone())) {
                return Err(Tables::conflict(record.kind, &new_key));
            }
            tables.unique.remove(&(record.kind, old_key));
            tables.unique.insert((record.kind, new_key), record.id);
        }

        tables
            .records
            .entry(record.kind)
            .or_default()
            .insert(record.id, record.clone());
        Ok(())
    }

    fn add_ref(
        &self,
        kind: EntityKind,
        id: EntityId,
        field: &str,
        target: EntityId,
    ) -> Result<bool> {
        if kind.natural_key().iter().any(|key| *key == field) {
            return Err(StoreError::Backend(format!(
                "{kind}.{field} is a natural-key field and cannot be appended to"
            )));
        }

        let mut tables = self.tables.write();
        let record = tables
            .records
            .get_mut(&kind)
            .and_then(|table| table.get_mut(&id))
            .ok_or(StoreError::NotFound { kind, id })?;
        let slot = record
            .fields
            .entry(field.to_string())
            .or_insert(FieldValue::Null);
        if slot.is_null() {
            *slot = FieldValue::RefSet(BTreeSet::new());
        }
        match slot {
            FieldValue::RefSet(refs) => Ok(refs.insert(target)),
            other => Err(StoreError::Backend(format!(
                "{kind} {id}: `{field}` holds {other}, not a reference set"
            ))),
        }
    }

    fn delete(&self, kind: EntityKind, id: EntityId) -> Result<()> {
        let mut tables = self.tables.write();
        let removed = tables
            .records
            .get_mut(&kind)
            .and_then(|table| table.remove(&id))
            .ok_or(StoreError::NotFound { kind, id })?;
        tables.unique.remove(&(kind, removed.natural_key()));
        Ok(())
    }

    fn count(&self, kind: EntityKind) -> Result<usize> {
        Ok(self
            .tables
            .read()
            .records
            .get(&kind)
            .map_or(0, BTreeMap::len))
    }
}
