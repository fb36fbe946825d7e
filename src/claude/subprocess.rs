//! Claude CLI spawning.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;

use crate::config::duration_from_env;
use crate::error::ClaudeError;

/// Default timeout for Claude subprocess execution (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Environment variable to override the default timeout, in seconds.
pub const TIMEOUT_ENV_VAR: &str = "ROLE_RELEASE_CLAUDE_TIMEOUT";

fn get_timeout() -> Duration {
    duration_from_env(TIMEOUT_ENV_VAR, DEFAULT_TIMEOUT_SECS)
}

fn spawn_error(e: std::io::Error) -> ClaudeError {
    if e.kind() == std::io::ErrorKind::NotFound {
        ClaudeError::NotInstalled
    } else {
        ClaudeError::SpawnFailed(e)
    }
}

/// Run `claude -p <prompt> --output-format json` and return stdout.
///
/// Times out after 5 minutes unless `ROLE_RELEASE_CLAUDE_TIMEOUT` says
/// otherwise.
pub async fn run_claude(prompt: &str) -> Result<String, ClaudeError> {
    let timeout_duration = get_timeout();

    let output = timeout(
        timeout_duration,
        Command::new("claude")
            .arg("-p")
            .arg(prompt)
            .arg("--output-format")
            .arg("json")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output(),
    )
    .await
    .map_err(|_| ClaudeError::Timeout(timeout_duration.as_secs()))?
    .map_err(spawn_error)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let code = output.status.code().unwrap_or(-1);
        return Err(ClaudeError::NonZeroExit { code, stderr });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
