//! Find-or-create by natural key.
//!
//! This is the only place that has to be safe under concurrent imports. No
//! lock is taken: a lookup miss is followed by a create, and if another
//! writer won the race in between, the store's [`StoreError::Conflict`] sends
//! us back to the lookup, which now finds the winner's record.

use signgraph_store::{EntityKind, EntityStore, Fields, Query, Record, StoreError};

/// Outcome of [`resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub record: Record,
    /// `true` only if this call persisted the record.
    pub created: bool,
}

impl Resolved {
    pub fn id(&self) -> signgraph_store::EntityId {
        self.record.id
    }
}

/// Query matching every field of `key` exactly.
pub fn key_query(kind: EntityKind, key: &Fields) -> Query {
    key.iter()
        .fold(Query::new(kind), |q, (field, value)| q.eq(field, value.clone()))
}

/// Return the `kind` record whose natural key equals `key`, creating it from
/// `key` plus `extra` when none exists.
///
/// `extra` is only used on creation; an existing record is returned as is.
pub fn resolve(
    store: &dyn EntityStore,
    kind: EntityKind,
    key: Fields,
    extra: Fields,
) -> Result<Resolved, StoreError> {
    debug_assert!(
        kind.natural_key().iter().all(|f| key.contains_key(*f)),
        "key for {kind} must bind every natural-key field"
    );

    let query = key_query(kind, &key);
    if let Some(record) = store.find_one(&query)? {
        return Ok(Resolved {
            record,
            created: false,
        });
    }

    let mut all = key;
    all.extend(extra);
    match store.create(kind, all) {
        Ok(record) => Ok(Resolved {
            record,
            created: true,
        }),
        Err(err) if err.is_conflict() => {
            tracing::debug!(%kind, error = %err, "lost create race, re-reading");
            match store.find_one(&query)? {
                Some(record) => Ok(Resolved {
                    record,
                    created: false,
                }),
                None => Err(err),
            }
        }
        Err(err) => Err(err),
    }
}
