//! `signgraph log` and `signgraph rollback`.

use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use signgraph_ingest::{rollback_job, ImportContext};
use signgraph_store::{
    ImportLog, ImportLogRepository, JobId, RowMessage, Storage, StoreSources, SystemClock,
};

pub(crate) fn parse_job_id(raw: &str) -> Result<JobId> {
    raw.trim()
        .parse()
        .with_context(|| format!("`{raw}` is not a job id"))
}

fn status_text(log: &ImportLog) -> &'static str {
    if log.is_rolled_back() {
        "rolled back"
    } else if log.status {
        "ok"
    } else {
        "failed rows"
    }
}

/// Color `text` by the state of `log`.
fn paint(log: &ImportLog, text: &str) -> colored::ColoredString {
    if log.is_rolled_back() {
        text.yellow()
    } else if log.status {
        text.green()
    } else {
        text.red()
    }
}

fn print_messages(title: &str, messages: &[RowMessage]) {
    if messages.is_empty() {
        return;
    }
    println!("  {}:", title.bold());
    for msg in messages {
        match &msg.word_unit_id {
            Some(unit) => println!("    line {:>6}  [{unit}] {}", msg.line, msg.message),
            None => println!("    line {:>6}  {}", msg.line, msg.message),
        }
    }
}

/// Print one import log; `details` adds per-row errors and warnings.
pub(crate) fn print_log(log: &ImportLog, details: bool) {
    println!(
        "{} {} ({})",
        "Job".bold(),
        log.id.to_string().bold(),
        paint(log, status_text(log)).bold()
    );
    println!("  label:     {}", log.label);
    println!("  operator:  {}", log.operator);
    println!("  source:    {} [{}]", log.source_filename, log.language);
    println!("  finished:  {}", log.timestamp.to_rfc3339());
    if let Some(at) = log.rolled_back_at {
        println!("  rollback:  {}", at.to_rfc3339());
    }
    println!(
        "  rows:      {} read, {} processed, {} failed, {} warnings",
        log.counters.rows_read,
        log.counters.processed,
        log.counters.failed,
        log.warnings.len()
    );
    for (kind, n) in log.created_by_kind() {
        println!("  {} {n} {kind}", "+".green());
    }
    println!("  {}", log.summary);

    if details {
        print_messages("errors", &log.errors);
        print_messages("warnings", &log.warnings);
    } else if !log.errors.is_empty() || !log.warnings.is_empty() {
        println!(
            "  {} `signgraph log show {}` lists failed rows and warnings",
            "→".cyan(),
            log.id
        );
    }
}

pub(crate) fn cmd_log_list(storage: &Storage) -> Result<()> {
    let logs = storage.logs().list()?;
    if logs.is_empty() {
        println!("no imports yet");
        return Ok(());
    }
    for log in logs {
        println!(
            "{}  {}  {}  {:>6} ok {:>6} failed {:>6} created  {}",
            log.id,
            log.timestamp.format("%Y-%m-%d %H:%M"),
            paint(&log, &format!("{:<11}", status_text(&log))),
            log.counters.processed,
            log.counters.failed,
            log.created_entities.len(),
            log.label
        );
    }
    Ok(())
}

pub(crate) fn cmd_log_show(storage: &Storage, job_id: &str, json: bool) -> Result<()> {
    let id = parse_job_id(job_id)?;
    let log = storage
        .logs()
        .load(id)?
        .ok_or_else(|| anyhow!("no import log for job {id}"))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&log)?);
    } else {
        print_log(&log, true);
    }
    Ok(())
}

pub(crate) fn cmd_rollback(storage: &Storage, job_id: &str) -> Result<()> {
    let id = parse_job_id(job_id)?;
    let sources = StoreSources::new(storage.store());
    let clock = SystemClock;
    let ctx = ImportContext::new(storage.store(), &sources, storage.logs(), &clock);

    let summary = rollback_job(id, &ctx)?;
    storage.flush()?;

    if summary.is_noop() {
        println!("{} job {id} has nothing left to roll back", "info:".yellow().bold());
        return Ok(());
    }
    println!("{} job {}", "Rolled back".green().bold(), id.to_string().bold());
    for (kind, tally) in &summary.per_kind {
        println!(
            "  {} {kind}: {} deleted, {} already gone, {} failed",
            "-".red(),
            tally.deleted,
            tally.not_found,
            tally.failed
        );
    }
    for err in &summary.errors {
        println!("  {} {err}", "!".red().bold());
    }
    Ok(())
}
