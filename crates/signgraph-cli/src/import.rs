//! `signgraph import`: drive an import job chunk by chunk.
//!
//! After every chunk the entity store is flushed first and the job state
//! second, so a resumed job never skips rows whose entities were lost.

use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::Args;
use colored::Colorize;
use signgraph_ingest::{finish_job, process_chunk, ImportContext, JobMetadata, JobState};
use signgraph_store::{Storage, StoreSources, SystemClock};

use crate::config::CliConfig;
use crate::logs::print_log;

#[derive(Debug, Args)]
pub(crate) struct ImportArgs {
    /// Tab- or comma-separated annotation table
    #[arg(required_unless_present = "resume")]
    file: Option<PathBuf>,
    /// Language of the annotations (default: from signgraph.json, else "und")
    #[arg(long)]
    language: Option<String>,
    /// Label for the import log (default: file name)
    #[arg(long)]
    label: Option<String>,
    /// Operator recorded in the import log (default: $USER)
    #[arg(long)]
    operator: Option<String>,
    /// Rows per chunk
    #[arg(long)]
    chunk_size: Option<usize>,
    /// Process a single chunk, then stop and keep the job resumable
    #[arg(long)]
    step: bool,
    /// Continue the interrupted job in the data directory
    #[arg(long, conflicts_with = "file")]
    resume: bool,
    /// Start a new job even if an unfinished one exists (its state is discarded)
    #[arg(long)]
    force: bool,
}

fn default_operator() -> String {
    env::var("USER")
        .or_else(|_| env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

fn new_job(storage: &Storage, config: &CliConfig, args: &ImportArgs) -> Result<JobState> {
    let file = args
        .file
        .as_ref()
        .ok_or_else(|| anyhow!("an input file is required unless --resume is given"))?;
    let state_path = &storage.config().job_state_path;

    if state_path.exists() {
        let pending = JobState::load(state_path)
            .with_context(|| format!("failed to read {}", state_path.display()))?;
        if !args.force {
            bail!(
                "job {} on {} is unfinished; continue it with `signgraph import --resume` or pass --force",
                pending.job_id,
                pending.metadata.source_filename()
            );
        }
        tracing::warn!(job_id = %pending.job_id, "discarding unfinished job");
    }

    let source_path = file
        .canonicalize()
        .with_context(|| format!("cannot open {}", file.display()))?;
    let mut metadata = JobMetadata {
        label: args.label.clone().unwrap_or_default(),
        operator: args.operator.clone().unwrap_or_else(default_operator),
        language: args
            .language
            .clone()
            .unwrap_or_else(|| config.import.default_language.clone()),
        source_path,
    };
    if metadata.label.is_empty() {
        metadata.label = metadata.source_filename();
    }

    let state = JobState::new(metadata);
    println!(
        "{} {} as job {}",
        "Importing".green().bold(),
        file.display(),
        state.job_id.to_string().bold()
    );
    Ok(state)
}

fn resumed_job(storage: &Storage) -> Result<JobState> {
    let state_path = &storage.config().job_state_path;
    if !state_path.exists() {
        bail!("no unfinished import in {}", state_path.display());
    }
    let state = JobState::load(state_path)
        .with_context(|| format!("failed to read {}", state_path.display()))?;
    println!(
        "{} job {} on {} at line {}",
        "Resuming".green().bold(),
        state.job_id.to_string().bold(),
        state.metadata.source_filename(),
        state.next_line
    );
    Ok(state)
}

pub(crate) fn cmd_import(storage: &Storage, config: &CliConfig, args: &ImportArgs) -> Result<()> {
    let mut state = if args.resume {
        resumed_job(storage)?
    } else {
        new_job(storage, config, args)?
    };

    let sources = StoreSources::new(storage.store());
    let clock = SystemClock;
    let ctx = ImportContext::new(storage.store(), &sources, storage.logs(), &clock)
        .with_chunk_size(args.chunk_size.unwrap_or(config.import.chunk_size));
    let state_path = storage.config().job_state_path.clone();

    loop {
        state = process_chunk(state, &ctx)?;
        storage.flush()?;
        state.save(&state_path)?;
        println!(
            "  {} {:>5.1}%  {} rows, {} failed",
            "→".cyan(),
            state.progress() * 100.0,
            state.counters.rows_read,
            state.counters.failed
        );
        if state.finished || args.step {
            break;
        }
    }

    if !state.finished {
        println!(
            "{} continue with `signgraph import --resume`",
            "paused:".yellow().bold()
        );
        return Ok(());
    }

    let log = finish_job(state, &ctx)?;
    fs::remove_file(&state_path)
        .with_context(|| format!("failed to remove {}", state_path.display()))?;
    print_log(&log, false);
    Ok(())
}
