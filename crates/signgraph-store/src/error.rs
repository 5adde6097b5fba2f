use crate::{EntityId, EntityKind};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A record with the same natural key already exists.
    #[error("natural key conflict for {kind}: {key}")]
    Conflict { kind: EntityKind, key: String },

    #[error("{kind} #{id} not found")]
    NotFound { kind: EntityKind, id: EntityId },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
