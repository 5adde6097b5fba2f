//! Documents the annotations belong to.
//!
//! Sources are provisioned out-of-band (`signgraph source add`); the importer
//! only ever looks them up.

use serde::{Deserialize, Serialize};

use crate::{fields, EntityId, EntityKind, EntityStore, FieldValue, Query, Record, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub id: EntityId,
    pub identifier: String,
    pub title: Option<String>,
}

impl Source {
    fn from_record(record: &Record) -> Self {
        Self {
            id: record.id,
            identifier: record.text("identifier").unwrap_or_default().to_string(),
            title: record.text("title").map(str::to_string),
        }
    }
}

/// Read-only lookup of provisioned sources.
pub trait SourceRepository: Send + Sync {
    fn find_by_identifier(&self, identifier: &str) -> Result<Option<Source>>;
}

/// [`SourceRepository`] reading `source` records from an [`EntityStore`].
pub struct StoreSources<'a> {
    store: &'a dyn EntityStore,
}

impl<'a> StoreSources<'a> {
    pub fn new(store: &'a dyn EntityStore) -> Self {
        Self { store }
    }

    /// Register a source, or return the existing one with that identifier.
    pub fn provision(&self, identifier: &str, title: Option<&str>) -> Result<Source> {
        if let Some(existing) = self.find_by_identifier(identifier)? {
            return Ok(existing);
        }
        let record = self.store.create(
            EntityKind::Source,
            fields([
                ("identifier", FieldValue::text(identifier)),
                (
                    "title",
                    title.map_or(FieldValue::Null, FieldValue::text),
                ),
            ]),
        )?;
        tracing::info!(identifier, id = record.id, "provisioned source");
        Ok(Source::from_record(&record))
    }
}

impl SourceRepository for StoreSources<'_> {
    fn find_by_identifier(&self, identifier: &str) -> Result<Option<Source>> {
        let query = Query::new(EntityKind::Source).eq("identifier", identifier);
        Ok(self.store.find_one(&query)?.as_ref().map(Source::from_record))
    }
}
