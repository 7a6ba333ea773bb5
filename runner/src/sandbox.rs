//! Docker-sandboxed execution of a student-built binary.
//!
//! The container gets no network, bounded memory/CPU/process limits, a
//! read-only root filesystem with the extracted code mounted read-only at
//! `/code`, and a small writable tmpfs. The binary runs under an in-sandbox
//! `timeout`, so captured output survives a timeout and still earns partial
//! rubric credit; a host-side timeout with a grace period is the backstop
//! for a wedged container.

use crate::execution_config::ExecutionConfig;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::{timeout, Duration};

/// Extra host-side seconds allowed beyond the in-sandbox timeout before the
/// run is abandoned.
const SANDBOX_GRACE_SECS: u64 = 15;

/// Runs `./<binary_name>` from `code_dir` inside the sandbox, writing
/// `stdin_stream` to its standard input.
///
/// Returns the combined stdout and stderr text. A non-zero exit status
/// (including the in-sandbox timeout) does not discard the captured output;
/// a diagnostic suffix is appended to it instead. Only a failure to run the
/// sandbox at all is an error.
pub async fn run_sandboxed(
    code_dir: &std::path::Path,
    binary_name: &str,
    stdin_stream: &str,
    config: &ExecutionConfig,
) -> Result<String, String> {
    let binary = shell_escape::escape(binary_name.into());
    let inner_command = format!("cd /code && timeout {}s ./{}", config.timeout_secs, binary);

    let mut child = Command::new("docker")
        .arg("run")
        .arg("--rm")
        .arg("-i")
        .arg("--network=none")
        .arg(format!("--memory={}", config.max_memory))
        .arg(format!("--cpus={}", config.max_cpus))
        .arg(format!("--pids-limit={}", config.max_processes))
        .arg("--security-opt=no-new-privileges")
        .arg("--read-only")
        .arg("--tmpfs")
        .arg("/tmp:rw,noexec,nosuid,size=50m")
        .arg("--user=1000:1000")
        .arg("-v")
        .arg(format!("{}:/code:ro", code_dir.display()))
        .arg(&config.image)
        .arg("sh")
        .arg("-c")
        .arg(&inner_command)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| format!("failed to start sandbox: {}", e))?;

    feed_stdin(&mut child, stdin_stream).await;

    let budget = Duration::from_secs(config.timeout_secs + SANDBOX_GRACE_SECS);
    let output = match timeout(budget, child.wait_with_output()).await {
        Ok(result) => result.map_err(|e| format!("sandbox wait failed: {}", e))?,
        Err(_) => {
            return Err(format!(
                "sandbox did not exit within {}s",
                budget.as_secs()
            ));
        }
    };

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        text.push_str(&format!("\n[PROGRAM_EXECUTION_ERROR: Exit code {}]", code));
    }

    Ok(text)
}

/// Writes the test input to the child's standard input.
///
/// A program that exits before consuming its input breaks the pipe; that
/// must not fail the run, or its already-captured stdout/stderr would be
/// replaced by an error sentinel and score zero. The write error is logged
/// and the run proceeds to collect output.
async fn feed_stdin(child: &mut tokio::process::Child, stdin_stream: &str) {
    if let Some(mut stdin) = child.stdin.take() {
        if let Err(e) = stdin.write_all(stdin_stream.as_bytes()).await {
            log::warn!("sandbox did not consume test input: {}", e);
        }
        // Dropping the handle closes the stream so the program sees EOF.
    }
}
