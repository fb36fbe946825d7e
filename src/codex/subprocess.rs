//! Codex CLI spawning.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;

use crate::config::duration_from_env;
use crate::error::CodexError;

/// Default timeout for Codex subprocess execution (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Environment variable to override the default timeout, in seconds.
pub const TIMEOUT_ENV_VAR: &str = "ROLE_RELEASE_CODEX_TIMEOUT";

fn get_timeout() -> Duration {
    duration_from_env(TIMEOUT_ENV_VAR, DEFAULT_TIMEOUT_SECS)
}

fn spawn_error(e: std::io::Error) -> CodexError {
    if e.kind() == std::io::ErrorKind::NotFound {
        CodexError::NotInstalled
    } else {
        CodexError::SpawnFailed(e)
    }
}

/// Run `codex exec <prompt>` and return stdout as free-form text.
///
/// Times out after 5 minutes unless `ROLE_RELEASE_CODEX_TIMEOUT` says
/// otherwise.
pub async fn run_codex(prompt: &str) -> Result<String, CodexError> {
    let timeout_duration = get_timeout();

    let mut cmd = Command::new("codex");
    cmd.arg("exec")
        .arg(prompt)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let output = timeout(timeout_duration, cmd.output())
        .await
        .map_err(|_| CodexError::Timeout(timeout_duration.as_secs()))?
        .map_err(spawn_error)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let code = output.status.code().unwrap_or(-1);
        return Err(CodexError::NonZeroExit { code, stderr });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_timeout_default() {
        temp_env::with_var_unset(TIMEOUT_ENV_VAR, || {
            assert_eq!(get_timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        });
    }

    #[test]
    fn test_get_timeout_invalid_env_uses_default() {
        temp_env::with_var(TIMEOUT_ENV_VAR, Some("five minutes"), || {
            assert_eq!(get_timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        });
    }
}
