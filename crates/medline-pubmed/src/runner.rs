//! Two-phase runner: pre-scan every file to build the assignment map, then
//! load every file's owned citations into the database. Both phases walk the
//! same sorted-by-path file list and split it across a `rayon` thread pool
//! sized to `PMPG_PROCESSES`, the same worker-pool shape the rest of this
//! pipeline's ancestry uses for file-parallel work.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use medline_core::WorkQueue;
use medline_store::Sink;

use crate::assignment::{self, AssignmentMap};
use crate::config::Config;
use crate::error::Error;
use crate::{loader, prescan};

#[derive(Debug, Default, Clone, Copy)]
pub struct Summary {
    pub files_scanned: usize,
    pub files_loaded: usize,
    pub files_skipped: usize,
    pub citations_inserted: usize,
    pub citations_skipped: usize,
}

/// List every `.xml`/`.xml.gz` file under `medline_path`, sorted by path for
/// deterministic worker assignment, honoring the optional `[start, end)`
/// slice from `PMPG_FILELIST_START`/`PMPG_FILELIST_END`.
pub fn list_files(config: &Config) -> Result<Vec<PathBuf>, Error> {
    let pattern = format!("{}/**/*.xml*", config.medline_path.display());
    let mut files: Vec<PathBuf> = glob::glob(&pattern)
        .map_err(|_| Error::Io {
            file: config.medline_path.display().to_string(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "bad glob pattern"),
        })?
        .filter_map(Result::ok)
        .filter(|p| p.extension().and_then(|e| e.to_str()) != Some("txt"))
        .collect();
    files.sort();

    let start = config.filelist_start.unwrap_or(0);
    let end = config.filelist_end.unwrap_or(files.len()).min(files.len());
    if start < end {
        Ok(files[start..end].to_vec())
    } else {
        Ok(Vec::new())
    }
}

/// Phase 1: write a sidecar for every file. Idempotent — safe to rerun.
pub fn run_prescan(config: &Config, files: &[PathBuf]) -> Summary {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.processes)
        .build()
        .expect("failed to build thread pool");

    let queue = Arc::new(WorkQueue::new(files.to_vec()));
    let progress = MultiProgress::new();
    let bar = progress.add(make_bar(files.len() as u64, "pre-scan"));

    let mut summary = Summary::default();

    pool.scope(|scope| {
        for _ in 0..config.processes {
            let queue = Arc::clone(&queue);
            let bar = bar.clone();
            scope.spawn(move |_| {
                while let Some(path) = queue.next().cloned() {
                    if medline_core::is_shutdown_requested() {
                        break;
                    }
                    match prescan::prescan_file(&path) {
                        Ok(_) => {}
                        Err(err) => log::error!("{}: pre-scan failed: {err}", path.display()),
                    }
                    bar.inc(1);
                }
            });
        }
    });

    summary.files_scanned = files.len();
    bar.finish_with_message("pre-scan complete");
    summary
}

/// Phase 2: build the assignment map, then load every file's owned citations.
pub fn run_load(config: &Config, sink: Sink, files: &[PathBuf]) -> Result<Summary, Error> {
    let assignment = assignment::build(&config.medline_path)?;
    log::info!("assignment map built: {} PMIDs claimed", assignment.len());

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.processes)
        .build()
        .expect("failed to build thread pool");

    let queue = Arc::new(WorkQueue::new(files.to_vec()));
    let progress = MultiProgress::new();
    let bar = progress.add(make_bar(files.len() as u64, "load"));

    let sink = Arc::new(sink);
    let assignment = Arc::new(assignment);
    let inserted = Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let skipped = Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let loaded = Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let already_done = Arc::new(std::sync::atomic::AtomicUsize::new(0));

    pool.scope(|scope| {
        for _ in 0..config.processes {
            let queue = Arc::clone(&queue);
            let bar = bar.clone();
            let sink = Arc::clone(&sink);
            let assignment = Arc::clone(&assignment);
            let inserted = Arc::clone(&inserted);
            let skipped = Arc::clone(&skipped);
            let loaded = Arc::clone(&loaded);
            let already_done = Arc::clone(&already_done);
            scope.spawn(move |_| {
                while let Some(path) = queue.next().cloned() {
                    if medline_core::is_shutdown_requested() {
                        break;
                    }
                    match loader::load_file(&sink, &assignment, &path) {
                        Ok(Some(stats)) => {
                            loaded.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                            inserted.fetch_add(stats.citations_inserted, std::sync::atomic::Ordering::Relaxed);
                            skipped.fetch_add(stats.citations_skipped, std::sync::atomic::Ordering::Relaxed);
                        }
                        Ok(None) => {
                            already_done.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                        }
                        Err(err) => log::error!("{}: load failed: {err}", path.display()),
                    }
                    bar.inc(1);
                }
            });
        }
    });

    bar.finish_with_message("load complete");

    Ok(Summary {
        files_scanned: files.len(),
        files_loaded: loaded.load(std::sync::atomic::Ordering::Relaxed),
        files_skipped: already_done.load(std::sync::atomic::Ordering::Relaxed),
        citations_inserted: inserted.load(std::sync::atomic::Ordering::Relaxed),
        citations_skipped: skipped.load(std::sync::atomic::Ordering::Relaxed),
    })
}

/// Prebuild the assignment map only — used by the `status` CLI command to
/// report how many PMIDs a run would claim without writing to the database.
pub fn build_assignment_map(path: &Path) -> Result<AssignmentMap, Error> {
    assignment::build(path)
}

fn make_bar(len: u64, label: &str) -> ProgressBar {
    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::with_template(&format!("{{spinner}} {label} [{{bar:40}}] {{pos}}/{{len}} {{msg}}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar
}
