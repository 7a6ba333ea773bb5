//! Submission pipeline: archive name parsing, extraction, build, sandboxed
//! execution, and binding the captured output into an assignment.
//!
//! Every stage failure after admission of the archive degrades to a
//! sentinel output string instead of aborting, so each student still
//! receives a mark (typically zero, since rubric patterns will not match a
//! sentinel). The only pipeline-level aborts are malformed archive names,
//! unknown assignments, missing test-input lookups, and admission-control
//! rejections — all reported as "no submission recorded".

use marker::{Assignment, ConfigSource, Date, Rejection};
use std::path::Path;
use tokio::process::Command;

pub mod execution_config;
pub mod extract;
pub mod sandbox;

pub use execution_config::ExecutionConfig;
use extract::extract_archive;

/// Recorded as the submission output when extraction fails (corrupt
/// archive, slip attempt, size bomb, or an empty result).
pub const EXTRACTION_FAILED: &str = "[EXTRACTION FAILED]";

/// Recorded as the submission output when the student's own build fails.
/// A build failure is a valid, scoreable outcome, not a reason to skip the
/// student.
pub const COMPILATION_FAILED: &str = "[COMPILATION FAILED]";

const ARCHIVE_EXTENSIONS: [&str; 4] = [".tar.gz", ".tgz", ".tar", ".zip"];

/// Strips a recognized archive extension, returning the remaining stem.
/// `None` if the name carries no recognized extension.
pub fn strip_archive_extension(file_name: &str) -> Option<&str> {
    ARCHIVE_EXTENSIONS
        .iter()
        .find_map(|ext| file_name.strip_suffix(ext))
}

/// True if the path names a file with a recognized archive extension.
pub fn is_supported_archive(path: &Path) -> bool {
    path.file_name()
        .and_then(|f| f.to_str())
        .and_then(strip_archive_extension)
        .is_some()
}

/// Parses `<studentId>_<assignmentId>.<ext>` into its identity parts.
///
/// The stem is split on the *first* underscore, so assignment names may
/// themselves contain underscores. Malformed names (no underscore,
/// non-numeric student id, empty assignment id, unrecognized extension)
/// yield `None` — fail fast, before any filesystem work.
pub fn parse_archive_name(file_name: &str) -> Option<(u32, String)> {
    let stem = strip_archive_extension(file_name)?;
    let (id, assignment) = stem.split_once('_')?;
    let student_id = id.parse::<u32>().ok()?;
    if assignment.is_empty() {
        return None;
    }
    Some((student_id, assignment.to_string()))
}

/// What happened to one archive that made it past name parsing.
#[derive(Debug)]
pub enum ProcessOutcome {
    Recorded {
        student_id: u32,
        assignment: String,
    },
    Rejected {
        student_id: u32,
        assignment: String,
        reason: Rejection,
    },
}

/// Drives one archive end-to-end: parse identity, resolve test inputs, run
/// the extract/build/execute stages, and hand the resulting output to
/// admission control under today's date.
///
/// Errors mean no submission was recorded for this archive; they never stop
/// the batch.
pub async fn process_archive(
    archive_path: &Path,
    assignments: &mut [Assignment],
    source: &dyn ConfigSource,
    config: &ExecutionConfig,
) -> Result<ProcessOutcome, String> {
    let file_name = archive_path
        .file_name()
        .and_then(|f| f.to_str())
        .ok_or_else(|| format!("unreadable archive path: {}", archive_path.display()))?;

    let (student_id, assignment_name) = parse_archive_name(file_name)
        .ok_or_else(|| format!("malformed archive name: {}", file_name))?;

    let assignment = assignments
        .iter_mut()
        .find(|a| a.name() == assignment_name)
        .ok_or_else(|| {
            format!(
                "no assignment named '{}' configured (student {})",
                assignment_name, student_id
            )
        })?;

    let inputs = source
        .resolve_test_inputs(&assignment_name)
        .map_err(|e| format!("cannot grade '{}': {}", assignment_name, e))?;
    let stdin_stream = join_input_lines(&inputs);

    let output = run_stages(archive_path, &assignment_name, &stdin_stream, config).await;

    match assignment.add_submission(student_id, output, Date::today()) {
        Ok(()) => Ok(ProcessOutcome::Recorded {
            student_id,
            assignment: assignment_name,
        }),
        Err(reason) => Ok(ProcessOutcome::Rejected {
            student_id,
            assignment: assignment_name,
            reason,
        }),
    }
}

/// Joins configured test-input lines into the sandbox's stdin stream.
fn join_input_lines(inputs: &[String]) -> String {
    if inputs.is_empty() {
        String::new()
    } else {
        inputs.join("\n") + "\n"
    }
}

/// Runs extraction, build, and sandboxed execution, converting each stage
/// failure into forward-fed sentinel text. Never fails; always produces the
/// text to be graded. The scratch directory is released on every exit path.
async fn run_stages(
    archive_path: &Path,
    assignment_name: &str,
    stdin_stream: &str,
    config: &ExecutionConfig,
) -> String {
    let scratch = match tempfile::tempdir() {
        Ok(dir) => dir,
        Err(e) => {
            log::error!("could not create scratch directory: {}", e);
            return EXTRACTION_FAILED.to_string();
        }
    };

    if let Err(e) = extract_archive(archive_path, config.max_uncompressed_size, scratch.path()) {
        log::warn!("extraction failed for {}: {}", archive_path.display(), e);
        return EXTRACTION_FAILED.to_string();
    }

    match std::fs::read_dir(scratch.path()) {
        Ok(mut entries) => {
            if entries.next().is_none() {
                log::warn!("archive {} extracted to nothing", archive_path.display());
                return EXTRACTION_FAILED.to_string();
            }
        }
        Err(_) => return EXTRACTION_FAILED.to_string(),
    }

    if !build_submission(scratch.path()).await {
        return COMPILATION_FAILED.to_string();
    }

    match sandbox::run_sandboxed(scratch.path(), assignment_name, stdin_stream, config).await {
        Ok(text) => text,
        Err(e) => {
            log::warn!("sandbox failed for {}: {}", archive_path.display(), e);
            format!("[PROGRAM_EXECUTION_ERROR: {}]", e)
        }
    }
}

/// Invokes the submission's own makefile in the scratch directory. The
/// binary it produces must be named after the assignment.
async fn build_submission(dir: &Path) -> bool {
    match Command::new("make").current_dir(dir).output().await {
        Ok(output) => {
            if !output.status.success() {
                log::warn!(
                    "make failed in {}: {}",
                    dir.display(),
                    String::from_utf8_lossy(&output.stderr).trim()
                );
            }
            output.status.success()
        }
        Err(e) => {
            log::warn!("could not run make in {}: {}", dir.display(), e);
            false
        }
    }
}
