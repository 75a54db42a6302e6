//! calomon CLI
//!
//! Replays recorded events through monitoring workers and reports the
//! filled metrics.
#![allow(clippy::uninlined_format_args)]

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use calomon_core::{EventRecord, RunType, StaticRunContext};
use calomon_tasks::{build_metric_ordering, MemorySink, MetricSummary, WorkerRegistry};

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("worker error: {0}")]
    Worker(#[from] calomon_tasks::Error),
}

/// Worker selection and parameters.
#[derive(Debug, Deserialize)]
struct Job {
    worker: String,
    #[serde(default)]
    params: serde_json::Value,
}

/// One recorded run.
#[derive(Debug, Deserialize)]
struct EventFile {
    /// Run type reported by each readout unit.
    #[serde(default)]
    run_types: Vec<RunType>,
    events: Vec<EventRecord>,
}

#[derive(Debug, Serialize)]
struct ReplayReport {
    worker: String,
    files: usize,
    skipped_files: usize,
    events: usize,
    metrics: Vec<MetricSummary>,
}

#[derive(Debug, Serialize)]
struct MetricEntry {
    name: &'static str,
    index: usize,
}

/// Calorimeter cluster monitoring.
#[derive(Parser)]
#[command(name = "calomon")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay recorded event files through a worker
    Replay {
        /// Job file naming the worker and its parameters
        job: PathBuf,

        /// Event files, one run each
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Write the summary here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the metric ordering table
    Metrics,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Replays one file; `None` if the run type filter rejects it.
fn replay_file(
    registry: &WorkerRegistry,
    job: &Job,
    path: &Path,
) -> Result<Option<(usize, MemorySink)>> {
    let run: EventFile = read_json(path)?;
    let mut worker = registry.create(&job.worker, &job.params)?;

    if !worker.filter_run_type(&run.run_types) {
        info!(
            "{}: run types {:?} not monitored, skipping",
            path.display(),
            run.run_types
        );
        return Ok(None);
    }

    worker.begin_run(&StaticRunContext::uniform_grid())?;
    let mut sink = MemorySink::new();
    for event in &run.events {
        worker.process_event(event, &mut sink)?;
    }
    debug!(
        "{}: {} events, {} fills",
        path.display(),
        run.events.len(),
        sink.total_fills()
    );
    Ok(Some((run.events.len(), sink)))
}

fn replay(job_path: &Path, inputs: &[PathBuf], verbose: bool) -> Result<ReplayReport> {
    let job: Job = read_json(job_path)?;
    let registry = WorkerRegistry::with_defaults();
    if !registry.contains(&job.worker) {
        return Err(calomon_tasks::Error::UnknownWorker(job.worker).into());
    }
    if verbose {
        eprintln!("Worker: {}", job.worker);
        eprintln!("Replaying {} file(s)...", inputs.len());
    }

    let results = inputs
        .par_iter()
        .map(|path| replay_file(&registry, &job, path))
        .collect::<Result<Vec<_>>>()?;

    let mut merged = MemorySink::new();
    let mut events = 0usize;
    let mut skipped_files = 0usize;
    for result in results {
        match result {
            Some((count, sink)) => {
                events += count;
                merged.merge(sink);
            }
            None => skipped_files += 1,
        }
    }
    if skipped_files == inputs.len() {
        warn!("no input file passed the run type filter");
    }

    Ok(ReplayReport {
        worker: job.worker,
        files: inputs.len(),
        skipped_files,
        events,
        metrics: merged.summary(),
    })
}

fn write_report<T: Serialize>(report: &T, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path).map_err(|source| CliError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, report)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            serde_json::to_writer_pretty(&mut lock, report)?;
            writeln!(lock)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Replay {
            job,
            inputs,
            output,
            verbose,
        } => {
            let start = Instant::now();
            let report = replay(&job, &inputs, verbose)?;
            if verbose {
                eprintln!(
                    "Replayed {} events from {} file(s) in {:.2}s ({} skipped)",
                    report.events,
                    report.files,
                    start.elapsed().as_secs_f64(),
                    report.skipped_files
                );
            }
            write_report(&report, output.as_deref())?;
        }

        Commands::Metrics => {
            let table: Vec<MetricEntry> = build_metric_ordering()
                .into_iter()
                .map(|(name, metric)| MetricEntry {
                    name,
                    index: metric.index(),
                })
                .collect();
            write_report(&table, None)?;
        }
    }

    Ok(())
}
