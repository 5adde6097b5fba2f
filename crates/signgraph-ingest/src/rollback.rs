//! Compensating rollback of an import job.
//!
//! Deletes what a job created, newest first, so dependents go before the
//! records they point at. Records that are already gone are counted and
//! skipped. A delete that fails is counted, logged and named in the rewritten
//! summary; the creation list is cleared regardless, so a log is rolled back
//! at most once.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use signgraph_store::{Clock, EntityKind, EntityStore, ImportLog, JobId};

use crate::error::{IngestError, Result};
use crate::ImportContext;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindTally {
    pub deleted: usize,
    pub not_found: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollbackSummary {
    pub deleted: usize,
    pub not_found: usize,
    pub failed: usize,
    pub per_kind: BTreeMap<EntityKind, KindTally>,
    /// One message per failed delete.
    pub errors: Vec<String>,
}

impl RollbackSummary {
    pub fn is_noop(&self) -> bool {
        self.deleted == 0 && self.not_found == 0 && self.failed == 0
    }

    fn describe(&self) -> String {
        let mut text = format!(
            "Rolled back: {} deleted, {} already gone, {} failed.",
            self.deleted, self.not_found, self.failed
        );
        let parts: Vec<String> = self
            .per_kind
            .iter()
            .filter(|(_, tally)| tally.deleted > 0)
            .map(|(kind, tally)| format!("{} {kind}", tally.deleted))
            .collect();
        if !parts.is_empty() {
            text.push_str(&format!(" Deleted {}.", parts.join(", ")));
        }
        if !self.errors.is_empty() {
            text.push_str(&format!(" Not deleted: {}.", self.errors.join("; ")));
        }
        text
    }
}

/// Undo everything `log` records as created.
///
/// Leaves `log` marked as rolled back with an empty creation list. Entities
/// whose delete failed are reported in the summary only. A log with nothing
/// left to undo is not touched.
pub fn rollback(log: &mut ImportLog, store: &dyn EntityStore, clock: &dyn Clock) -> RollbackSummary {
    let mut summary = RollbackSummary::default();
    if log.created_entities.is_empty() {
        tracing::info!(job_id = %log.id, "nothing to roll back");
        return summary;
    }

    for entity in log.created_entities.iter().rev() {
        let tally = summary.per_kind.entry(entity.kind).or_default();
        match store.delete(entity.kind, entity.id) {
            Ok(()) => {
                tally.deleted += 1;
                summary.deleted += 1;
            }
            Err(err) if err.is_not_found() => {
                tally.not_found += 1;
                summary.not_found += 1;
            }
            Err(err) => {
                tracing::warn!(
                    job_id = %log.id,
                    kind = %entity.kind,
                    id = entity.id,
                    error = %err,
                    "rollback delete failed"
                );
                tally.failed += 1;
                summary.failed += 1;
                summary.errors.push(format!("{} {}: {err}", entity.kind, entity.id));
            }
        }
    }

    log.status = false;
    log.summary = summary.describe();
    log.created_entities = Vec::new();
    log.rolled_back_at = Some(clock.now());

    tracing::info!(
        job_id = %log.id,
        deleted = summary.deleted,
        not_found = summary.not_found,
        failed = summary.failed,
        "rollback finished"
    );
    summary
}

/// Load the log of `job_id`, roll it back and save it.
pub fn rollback_job(job_id: JobId, ctx: &ImportContext<'_>) -> Result<RollbackSummary> {
    let mut log = ctx
        .logs
        .load(job_id)?
        .ok_or(IngestError::LogNotFound(job_id))?;
    let summary = rollback(&mut log, ctx.store, ctx.clock);
    if !summary.is_noop() {
        ctx.logs.save(&log)?;
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use signgraph_store::{
        fields, CreatedEntity, EntityId, FieldValue, Fields, FixedClock, ImportCounters,
        InMemoryStore, Query, Record, StoreError,
    };

    fn log_with(created: Vec<CreatedEntity>) -> ImportLog {
        ImportLog {
            id: uuid::Uuid::new_v4(),
            label: "batch".into(),
            operator: "tester".into(),
            timestamp: chrono::Utc::now(),
            status: true,
            summary: String::new(),
            created_entities: created,
            source_filename: "rows.tsv".into(),
            language: "egy".into(),
            counters: ImportCounters::default(),
            errors: Vec::new(),
            warnings: Vec::new(),
            rolled_back_at: None,
        }
    }

    fn sign(store: &InMemoryStore, code: &str) -> CreatedEntity {
        let record = store
            .create(
                EntityKind::Sign,
                fields([
                    ("sign_code", FieldValue::text(code)),
                    ("language", FieldValue::text("egy")),
                ]),
            )
            .unwrap();
        CreatedEntity {
            kind: EntityKind::Sign,
            id: record.id,
        }
    }

    /// Refuses to delete one id and records the order of delete calls.
    struct StubbornStore {
        inner: InMemoryStore,
        protected: EntityId,
        calls: std::sync::Mutex<Vec<EntityId>>,
    }

    impl EntityStore for StubbornStore {
        fn find(&self, query: &Query) -> signgraph_store::Result<Vec<Record>> {
            self.inner.find(query)
        }

        fn load(&self, kind: EntityKind, id: EntityId) -> signgraph_store::Result<Option<Record>> {
            self.inner.load(kind, id)
        }

        fn create(&self, kind: EntityKind, fields: Fields) -> signgraph_store::Result<Record> {
            self.inner.create(kind, fields)
        }

        fn update(&self, record: &Record) -> signgraph_store::Result<()> {
            self.inner.update(record)
        }

        fn add_ref(
            &self,
            kind: EntityKind,
            id: EntityId,
            field: &str,
            target: EntityId,
        ) -> signgraph_store::Result<bool> {
            self.inner.add_ref(kind, id, field, target)
        }

        fn delete(&self, kind: EntityKind, id: EntityId) -> signgraph_store::Result<()> {
            self.calls.lock().unwrap().push(id);
            if id == self.protected {
                return Err(StoreError::Backend("locked".into()));
            }
            self.inner.delete(kind, id)
        }
    }

    #[test]
    fn deletes_newest_first_and_counts_missing() {
        let inner = InMemoryStore::new();
        let a = sign(&inner, "A1");
        let b = sign(&inner, "A2");
        let c = sign(&inner, "A3");
        inner.delete(EntityKind::Sign, b.id).unwrap();

        let store = StubbornStore {
            inner,
            protected: 0,
            calls: Default::default(),
        };
        let clock = FixedClock(chrono::Utc::now());
        let mut log = log_with(vec![a, b, c]);
        let summary = rollback(&mut log, &store, &clock);

        assert_eq!(*store.calls.lock().unwrap(), vec![c.id, b.id, a.id]);
        assert_eq!(summary.deleted, 2);
        assert_eq!(summary.not_found, 1);
        assert_eq!(summary.per_kind[&EntityKind::Sign].deleted, 2);
        assert!(!log.status);
        assert!(log.created_entities.is_empty());
        assert_eq!(log.rolled_back_at, Some(clock.0));
        assert_eq!(store.inner.count(EntityKind::Sign).unwrap(), 0);
    }

    #[test]
    fn failed_deletes_are_reported_and_the_log_is_cleared() {
        let inner = InMemoryStore::new();
        let a = sign(&inner, "A1");
        let b = sign(&inner, "A2");
        let store = StubbornStore {
            inner,
            protected: a.id,
            calls: Default::default(),
        };
        let clock = FixedClock(chrono::Utc::now());
        let mut log = log_with(vec![a, b]);

        let summary = rollback(&mut log, &store, &clock);
        assert_eq!(summary.deleted, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.errors.len(), 1);
        assert!(log.created_entities.is_empty());
        assert!(log.summary.contains("1 failed"), "{}", log.summary);
        assert!(log.summary.contains(&format!("sign {}", a.id)), "{}", log.summary);

        let again = rollback(&mut log, &store, &clock);
        assert!(again.is_noop());
        assert_eq!(*store.calls.lock().unwrap(), vec![b.id, a.id]);
        assert_eq!(store.inner.count(EntityKind::Sign).unwrap(), 1);
    }

    #[test]
    fn second_rollback_is_a_noop() {
        let store = InMemoryStore::new();
        let clock = FixedClock(chrono::Utc::now());
        let mut log = log_with(vec![sign(&store, "A1")]);

        rollback(&mut log, &store, &clock);
        let first_summary = log.summary.clone();
        let again = rollback(&mut log, &store, &clock);

        assert!(again.is_noop());
        assert_eq!(log.summary, first_summary);
    }
}
