//! medline - CLI driver for the MEDLINE/PubMed ingest pipeline.
//!
//! Loads configuration from the environment (`.env` honored via `dotenvy`),
//! runs schema migrations once, then dispatches to one of the pipeline
//! phases.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use medline_pubmed::Config;
use medline_pubmed::runner;
use medline_store::{Sink, build_pool, reset_database, run_migrations};

#[derive(Parser)]
#[command(name = "medline")]
#[command(about = "MEDLINE/PubMed XML ingest pipeline")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Write PMID:Version sidecars for every file (idempotent)
    Prescan,
    /// Load every owned, non-duplicate citation into the database
    Load,
    /// Run pre-scan then load in sequence
    Run,
    /// Report file counts and assignment-map size without writing
    Status,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    medline_core::init_logging(false, cli.verbose, None);

    let config = Config::from_env().context("loading configuration")?;

    match cli.command {
        Command::Prescan => {
            let files = runner::list_files(&config)?;
            log::info!("pre-scanning {} files", files.len());
            let summary = runner::run_prescan(&config, &files);
            log::info!("pre-scan complete: {} files scanned", summary.files_scanned);
        }
        Command::Load => {
            let sink = build_sink(&config)?;
            let files = runner::list_files(&config)?;
            log::info!("loading {} files", files.len());
            let summary = runner::run_load(&config, sink, &files)?;
            report(summary);
        }
        Command::Run => {
            let files = runner::list_files(&config)?;
            log::info!("pre-scanning {} files", files.len());
            runner::run_prescan(&config, &files);

            let sink = build_sink(&config)?;
            log::info!("loading {} files", files.len());
            let summary = runner::run_load(&config, sink, &files)?;
            report(summary);
        }
        Command::Status => {
            let files = runner::list_files(&config)?;
            let assignment = runner::build_assignment_map(&config.medline_path)?;
            println!("files discovered:   {}", files.len());
            println!("PMIDs claimed:      {}", assignment.len());
        }
    }

    Ok(())
}

fn build_sink(config: &Config) -> Result<Sink> {
    let pool = build_pool(&config.database_url(), config.processes as u32)?;
    if config.clean {
        log::info!("PMPG_CLEAN set: dropping and recreating all tables");
        reset_database(&pool)?;
    } else {
        run_migrations(&pool)?;
    }
    Ok(Sink::new(pool))
}

fn report(summary: medline_pubmed::Summary) {
    log::info!(
        "done: {} files loaded, {} already processed, {} citations inserted, {} citations skipped",
        summary.files_loaded,
        summary.files_skipped,
        summary.citations_inserted,
        summary.citations_skipped,
    );
}
