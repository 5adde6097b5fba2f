//! Sign annotation import for Signgraph
//!
//! Turns tab- or comma-separated annotation tables into the entity graph kept
//! by `signgraph-store`:
//!
//! ```text
//!   source file ──► reader ──► ImportRow ──► GraphBuilder ──► EntityStore
//!        ▲            (chunk)      │            (upsert)            │
//!        │                         ▼                                ▼
//!     JobState ◄──── scheduler ◄── sequencing          created-entity log
//!    (offset, header,                                               │
//!     counters)            finish_job ──► ImportLog ──► rollback ◄──┘
//! ```
//!
//! A job is driven one chunk at a time. All state between chunks lives in a
//! serializable [`JobState`], so the host decides when to persist, resume or
//! abandon a job.

pub mod builder;
pub mod error;
pub mod reader;
pub mod rollback;
pub mod row;
pub mod scheduler;
pub mod sequencing;
pub mod taxonomy;
pub mod upsert;

use serde::{Deserialize, Serialize};
use signgraph_store::{Clock, EntityStore, ImportLogRepository, SourceRepository};

pub use builder::{GraphBuilder, RowOutcome, Step};
pub use error::{IngestError, Result, RowError};
pub use rollback::{rollback, rollback_job, KindTally, RollbackSummary};
pub use row::{Header, ImportRow};
pub use scheduler::{finish_job, process_chunk, run_to_completion, JobMetadata, JobState};
pub use sequencing::SequenceState;
pub use taxonomy::Vocabulary;
pub use upsert::{resolve, Resolved};

/// Importer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Rows handled per call to [`process_chunk`].
    pub chunk_size: usize,
    /// Language for jobs that do not name one.
    pub default_language: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            chunk_size: 50,
            default_language: "und".to_string(),
        }
    }
}

/// Collaborators an import job runs against.
#[derive(Clone, Copy)]
pub struct ImportContext<'a> {
    pub store: &'a dyn EntityStore,
    pub sources: &'a dyn SourceRepository,
    pub logs: &'a dyn ImportLogRepository,
    pub clock: &'a dyn Clock,
    pub chunk_size: usize,
}

impl<'a> ImportContext<'a> {
    pub fn new(
        store: &'a dyn EntityStore,
        sources: &'a dyn SourceRepository,
        logs: &'a dyn ImportLogRepository,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            store,
            sources,
            logs,
            clock,
            chunk_size: ImportConfig::default().chunk_size,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }
}
