//! Probe command execution
//!
//! Runs a diagnostic command and captures its stdout as text. Failures are
//! logged and degrade to an empty string, which fails every downstream
//! substring check and so yields a conservative "not a VM" verdict. Exit
//! status is irrelevant; only the output text matters.

use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::warn;

/// Bound on how long a probe command may run.
pub(crate) const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Run `program` with `args` and return its stdout.
pub(crate) async fn capture_stdout(program: &str, args: &[&str]) -> String {
    capture_stdout_with_stdin(program, args, None).await
}

/// Run `program` with `args`, optionally feeding `stdin_data` to the child.
///
/// Secrets reach the child through its stdin pipe, never through the command
/// line where they would be visible in the process table.
pub(crate) async fn capture_stdout_with_stdin(
    program: &str,
    args: &[&str],
    stdin_data: Option<&str>,
) -> String {
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(if stdin_data.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) => {
            warn!(program, error = %e, "Failed to spawn probe command");
            return String::new();
        }
    };

    if let Some(data) = stdin_data {
        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(data.as_bytes()).await {
                warn!(program, error = %e, "Failed to write probe command stdin");
            }
            // Dropping the handle closes the pipe so the child sees EOF
        }
    }

    match timeout(PROBE_TIMEOUT, child.wait_with_output()).await {
        Ok(Ok(output)) => String::from_utf8_lossy(&output.stdout).into_owned(),
        Ok(Err(e)) => {
            warn!(program, error = %e, "Probe command failed");
            String::new()
        }
        Err(_) => {
            warn!(
                program,
                timeout_secs = PROBE_TIMEOUT.as_secs(),
                "Probe command timed out"
            );
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_capture_stdout_returns_output() {
        let output = capture_stdout("echo", &["hello"]).await;
        assert_eq!(output.trim(), "hello");
    }

    #[tokio::test]
    async fn test_missing_program_degrades_to_empty() {
        let output = capture_stdout("healthmon-no-such-binary", &[]).await;
        assert_eq!(output, "");
    }

    #[tokio::test]
    async fn test_nonzero_exit_still_captures_stdout() {
        // `sh -c` prints then fails; only the text matters
        let output = capture_stdout("sh", &["-c", "echo partial; exit 3"]).await;
        assert_eq!(output.trim(), "partial");
    }

    #[tokio::test]
    async fn test_stdin_reaches_child() {
        let output = capture_stdout_with_stdin("cat", &[], Some("piped secret\n")).await;
        assert_eq!(output, "piped secret\n");
    }
}
