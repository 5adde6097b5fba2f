//! Signgraph CLI
//!
//! Command-line interface for:
//! - Provisioning sources and region labels
//! - Importing sign annotation tables (all at once, or chunk by chunk)
//! - Inspecting import logs and rolling jobs back

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod catalog;
mod config;
mod import;
mod logs;

#[derive(Parser)]
#[command(name = "signgraph")]
#[command(author, version, about = "Signgraph: sign annotation graph importer")]
struct Cli {
    /// Directory holding the store, import logs and job state
    #[arg(long, global = true, default_value = "./signgraph")]
    data_dir: PathBuf,
    /// Debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage annotated sources
    Source {
        #[command(subcommand)]
        command: SourceCommands,
    },

    /// Manage region labels on annotation pages
    Label {
        #[command(subcommand)]
        command: LabelCommands,
    },

    /// Import an annotation table, or resume an interrupted import
    Import(import::ImportArgs),

    /// Inspect import logs
    Log {
        #[command(subcommand)]
        command: LogCommands,
    },

    /// Delete every entity a job created
    Rollback {
        /// Job id, as shown by `signgraph log list`
        job_id: String,
    },

    /// Entity counts per kind
    Stats,
}

#[derive(Subcommand)]
enum SourceCommands {
    /// Register a source document
    Add {
        identifier: String,
        #[arg(long)]
        title: Option<String>,
    },
}

#[derive(Subcommand)]
enum LabelCommands {
    /// Register a label on a page of a source
    Add {
        #[arg(long)]
        source: String,
        #[arg(long)]
        page: i64,
        #[arg(long)]
        name: String,
    },
}

#[derive(Subcommand)]
enum LogCommands {
    /// One line per import job, oldest first
    List,
    /// Full report of one job, including failed rows and warnings
    Show {
        job_id: String,
        /// Print the raw log as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = config::CliConfig::load(&cli.data_dir)?;
    let storage = signgraph_store::open_storage(&cli.data_dir)
        .with_context(|| format!("failed to open storage in {}", cli.data_dir.display()))?;

    match cli.command {
        Commands::Source { command } => match command {
            SourceCommands::Add { identifier, title } => {
                catalog::cmd_source_add(&storage, &identifier, title.as_deref())?;
            }
        },
        Commands::Label { command } => match command {
            LabelCommands::Add { source, page, name } => {
                catalog::cmd_label_add(&storage, &source, page, &name)?;
            }
        },
        Commands::Import(args) => import::cmd_import(&storage, &config, &args)?,
        Commands::Log { command } => match command {
            LogCommands::List => logs::cmd_log_list(&storage)?,
            LogCommands::Show { job_id, json } => logs::cmd_log_show(&storage, &job_id, json)?,
        },
        Commands::Rollback { job_id } => logs::cmd_rollback(&storage, &job_id)?,
        Commands::Stats => catalog::cmd_stats(&storage)?,
    }
    Ok(())
}
