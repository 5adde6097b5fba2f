use signgraph_store::{JobId, StoreError};

/// Why a single row could not be imported. The job carries on.
#[derive(Debug, thiserror::Error)]
pub enum RowError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` is not an integer: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("expected {expected} columns, found {found}")]
    ColumnCount { expected: usize, found: usize },

    #[error("row is not valid UTF-8")]
    Encoding,

    #[error("malformed record: {0}")]
    Malformed(String),

    #[error("source `{0}` is not provisioned")]
    SourceNotFound(String),

    #[error("taxonomy term `{name}` in `{vocabulary}` could not be resolved")]
    TermUnresolved { vocabulary: String, name: String },

    #[error("step `{step}` requires `{requires}`, which was not resolved")]
    MissingPredecessor {
        step: &'static str,
        requires: &'static str,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures that stop a whole import job step.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("source file has no header row")]
    EmptySource,

    #[error("header is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("job {0} has not consumed its whole source yet")]
    JobNotFinished(JobId),

    #[error("no import log for job {0}")]
    LogNotFound(JobId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T, E = IngestError> = std::result::Result<T, E>;
