//! Chunked, resumable import jobs.
//!
//! ```text
//!   JobState::new ──► process_chunk ──► process_chunk ──► ... ──► finish_job
//!                         │ (header parsed on the first call)         │
//!                         └── state.save() between calls ──┘          ▼
//!                                                                 ImportLog
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use signgraph_store::{CreatedEntity, ImportCounters, ImportLog, JobId, RowMessage};
use uuid::Uuid;

use crate::builder::GraphBuilder;
use crate::error::{IngestError, Result, RowError};
use crate::reader::{estimate_rows, read_chunk, read_header, ReadRow};
use crate::row::Header;
use crate::sequencing::SequenceState;
use crate::ImportContext;

/// Who started a job, on what, and in which language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobMetadata {
    pub label: String,
    pub operator: String,
    pub language: String,
    pub source_path: PathBuf,
}

impl JobMetadata {
    /// File name of the source, as recorded in the import log.
    pub fn source_filename(&self) -> String {
        self.source_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source_path.display().to_string())
    }
}

/// Everything a job carries from one chunk to the next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobState {
    pub job_id: JobId,
    pub metadata: JobMetadata,
    /// Byte offset of the next unread record.
    pub offset: u64,
    /// Line number of the next unread record.
    pub next_line: u64,
    /// Parsed on the first chunk and reused afterwards.
    pub header: Option<Header>,
    pub sequencing: SequenceState,
    pub counters: ImportCounters,
    pub created: Vec<CreatedEntity>,
    pub warnings: Vec<RowMessage>,
    pub errors: Vec<RowMessage>,
    pub total_rows_estimate: Option<u64>,
    pub finished: bool,
}

impl JobState {
    pub fn new(metadata: JobMetadata) -> Self {
        Self {
            job_id: Uuid::new_v4(),
            metadata,
            offset: 0,
            next_line: 1,
            header: None,
            sequencing: SequenceState::default(),
            counters: ImportCounters::default(),
            created: Vec::new(),
            warnings: Vec::new(),
            errors: Vec::new(),
            total_rows_estimate: None,
            finished: false,
        }
    }

    /// Fraction of the source consumed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.finished {
            return 1.0;
        }
        match self.total_rows_estimate {
            Some(total) if total > 0 => {
                (self.counters.rows_read as f64 / total as f64).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(self)?)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn record_failure(&mut self, line: u64, word_unit_id: Option<String>, err: &RowError) {
        tracing::warn!(job_id = %self.job_id, line, error = %err, "row failed");
        self.counters.failed += 1;
        self.errors.push(RowMessage {
            line,
            word_unit_id,
            message: err.to_string(),
        });
    }
}

/// Parse the header and size up the source. Runs once per job.
fn start(state: &mut JobState) -> Result<Header> {
    let path = state.metadata.source_path.clone();
    let (header, offset) = read_header(&path)?;
    let missing = header.missing_required();
    if !missing.is_empty() {
        return Err(IngestError::MissingColumns(missing));
    }

    let estimate = estimate_rows(&path, offset)?;
    tracing::info!(
        job_id = %state.job_id,
        source = %path.display(),
        language = %state.metadata.language,
        rows = estimate,
        "starting import"
    );

    state.offset = offset;
    state.next_line = 2;
    state.total_rows_estimate = Some(estimate);
    state.header = Some(header.clone());
    Ok(header)
}

/// Process the next chunk of at most `ctx.chunk_size` rows.
///
/// A finished job is returned unchanged.
pub fn process_chunk(mut state: JobState, ctx: &ImportContext<'_>) -> Result<JobState> {
    if state.finished {
        return Ok(state);
    }

    let header = match state.header.clone() {
        Some(header) => header,
        None => start(&mut state)?,
    };

    let chunk = read_chunk(
        &state.metadata.source_path,
        &header,
        state.offset,
        state.next_line,
        ctx.chunk_size.max(1),
    )?;

    let language = state.metadata.language.clone();
    let builder = GraphBuilder::new(ctx.store, ctx.sources, &language);
    let before = state.counters;

    for ReadRow { line, row } in chunk.rows {
        state.counters.rows_read += 1;

        // Malformed records never reach the builder or the sequencing state.
        let row = match row {
            Ok(row) => row,
            Err(err) => {
                state.record_failure(line, None, &err);
                continue;
            }
        };

        let word_unit_id = row.word_unit_id.as_deref();
        let sign_sequence = state.sequencing.begin(word_unit_id);
        match builder.build(&row, sign_sequence, &mut state.created) {
            Ok(outcome) => {
                state.counters.processed += 1;
                state.warnings.extend(outcome.warnings.into_iter().map(|message| RowMessage {
                    line,
                    word_unit_id: row.word_unit_id.clone(),
                    message,
                }));
                state.sequencing.finish(word_unit_id, true);
            }
            Err(err) => {
                state.record_failure(line, row.word_unit_id.clone(), &err);
                state.sequencing.finish(word_unit_id, false);
            }
        }
    }

    state.offset = chunk.next_offset;
    state.next_line = chunk.next_line;
    state.finished = chunk.exhausted;

    tracing::info!(
        job_id = %state.job_id,
        rows = state.counters.rows_read - before.rows_read,
        processed = state.counters.processed - before.processed,
        failed = state.counters.failed - before.failed,
        progress = state.progress(),
        "chunk done"
    );
    Ok(state)
}

fn summarize(state: &JobState, log: &ImportLog) -> String {
    let mut summary = format!(
        "Imported {} from {}: {} rows read, {} processed, {} failed, {} warnings.",
        state.metadata.label,
        log.source_filename,
        state.counters.rows_read,
        state.counters.processed,
        state.counters.failed,
        state.warnings.len(),
    );
    let created = log.created_by_kind();
    if created.is_empty() {
        summary.push_str(" No entities created.");
    } else {
        let parts: Vec<String> = created
            .iter()
            .map(|(kind, n)| format!("{n} {kind}"))
            .collect();
        summary.push_str(&format!(" Created {}.", parts.join(", ")));
    }
    summary
}

/// Write the import log of a finished job.
pub fn finish_job(state: JobState, ctx: &ImportContext<'_>) -> Result<ImportLog> {
    if !state.finished {
        return Err(IngestError::JobNotFinished(state.job_id));
    }

    let mut log = ImportLog {
        id: state.job_id,
        label: state.metadata.label.clone(),
        operator: state.metadata.operator.clone(),
        timestamp: ctx.clock.now(),
        status: state.counters.failed == 0,
        summary: String::new(),
        created_entities: state.created.clone(),
        source_filename: state.metadata.source_filename(),
        language: state.metadata.language.clone(),
        counters: state.counters,
        errors: state.errors.clone(),
        warnings: state.warnings.clone(),
        rolled_back_at: None,
    };
    log.summary = summarize(&state, &log);
    ctx.logs.save(&log)?;

    tracing::info!(
        job_id = %log.id,
        processed = log.counters.processed,
        failed = log.counters.failed,
        created = log.created_entities.len(),
        "import finished"
    );
    Ok(log)
}

/// Process every remaining chunk, then finish the job.
pub fn run_to_completion(mut state: JobState, ctx: &ImportContext<'_>) -> Result<ImportLog> {
    while !state.finished {
        state = process_chunk(state, ctx)?;
    }
    finish_job(state, ctx)
}
