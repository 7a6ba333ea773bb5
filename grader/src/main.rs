//! Batch grading driver.
//!
//! Takes one path — a submission archive or a directory of them — loads the
//! grading configuration, runs every archive through the submission
//! pipeline, grades all recorded submissions, and writes the report.
//!
//! Archives are named `<studentId>_<assignmentId>.<ext>`, e.g.
//! `123456_A1.zip` for student 123456 submitting assignment A1. Each
//! archive must contain a makefile producing a binary named after the
//! assignment.

use anyhow::{Context, Result, bail};
use clap::Parser;
use common::config::Config;
use common::logger::init_logger;
use marker::{Assignment, ConfigSource, JsonConfigSource, RubricSource};
use runner::{ExecutionConfig, ProcessOutcome};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "grader",
    about = "Batch autograder for archived student submissions"
)]
struct Args {
    /// A submission archive, or a directory of archives (non-archive
    /// entries are ignored)
    path: PathBuf,

    /// Grading configuration file (defaults to GRADING_CONFIG from the
    /// environment)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let cfg = Config::init(".env");
    init_logger(&cfg.log_level, &cfg.log_file);
    log::info!("{} starting", cfg.project_name);

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(&cfg.grading_config));
    let source = JsonConfigSource::from_file(&config_path)
        .with_context(|| format!("loading grading config {}", config_path.display()))?;
    let exec_config = ExecutionConfig::from_config_file(&config_path);

    let mut assignments = build_assignments(&source);
    if assignments.is_empty() {
        bail!("no usable assignments in {}", config_path.display());
    }

    let archives = collect_archives(&args.path)?;
    log::info!("processing {} archive(s)", archives.len());

    for archive in &archives {
        match runner::process_archive(archive, &mut assignments, &source, &exec_config).await {
            Ok(ProcessOutcome::Recorded {
                student_id,
                assignment,
            }) => {
                log::info!(
                    "recorded submission from student {} for assignment {}",
                    student_id,
                    assignment
                );
            }
            Ok(ProcessOutcome::Rejected {
                student_id,
                assignment,
                reason,
            }) => {
                log::warn!(
                    "student {} assignment {}: {}; no submission recorded",
                    student_id,
                    assignment,
                    reason
                );
            }
            Err(e) => {
                log::error!("{}: {}; no submission recorded", archive.display(), e);
            }
        }
    }

    for assignment in &mut assignments {
        assignment.grade_all_submissions();
    }

    write_report(&assignments, Path::new(&cfg.report_file));
    Ok(())
}

/// Builds one [`Assignment`] per configured id. A record whose rubric fails
/// to resolve is a real configuration failure: it is logged and the
/// assignment skipped, but the rest of the run proceeds.
fn build_assignments(source: &dyn ConfigSource) -> Vec<Assignment> {
    let mut assignments = Vec::new();

    for id in source.assignment_ids() {
        let record = match source.resolve_assignment(&id) {
            Ok(record) => record,
            Err(e) => {
                log::error!("skipping assignment '{}': {}", id, e);
                continue;
            }
        };

        let rubric = match RubricSource::ByReference(record.rubric.clone()).build(source) {
            Ok(rubric) => rubric,
            Err(e) => {
                log::error!("skipping assignment '{}': {}", id, e);
                continue;
            }
        };

        assignments.push(Assignment::new(
            &id,
            &record.description,
            record.due_date,
            rubric,
        ));
    }

    assignments
}

/// Resolves the input path into the ordered list of archives to process.
/// An invalid path is an error before any processing begins.
fn collect_archives(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        if !runner::is_supported_archive(path) {
            bail!("{} is not a supported archive", path.display());
        }
        return Ok(vec![path.to_path_buf()]);
    }

    if path.is_dir() {
        let mut archives: Vec<PathBuf> = fs::read_dir(path)
            .with_context(|| format!("reading directory {}", path.display()))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.is_file() && runner::is_supported_archive(p))
            .collect();
        archives.sort();
        return Ok(archives);
    }

    bail!(
        "invalid input path: {} (must be an archive or a directory)",
        path.display()
    );
}

/// Writes one report line per graded submission. If the report file cannot
/// be opened, the same content goes to stdout instead — never a crash.
fn write_report(assignments: &[Assignment], report_path: &Path) {
    let lines: Vec<String> = assignments
        .iter()
        .flat_map(|a| a.submissions().iter().map(|s| s.report_line()))
        .collect();

    match File::create(report_path) {
        Ok(mut file) => {
            for line in &lines {
                if let Err(e) = writeln!(file, "{}", line) {
                    log::warn!("failed to write report line: {}", e);
                }
            }
            log::info!(
                "wrote {} result(s) to {}",
                lines.len(),
                report_path.display()
            );
        }
        Err(e) => {
            log::warn!(
                "could not open report file {}: {}; printing to console",
                report_path.display(),
                e
            );
            for line in &lines {
                println!("{}", line);
            }
        }
    }
}
