//! Retrying Claude calls and unwrapping the CLI's JSON envelope.

use async_trait::async_trait;

use crate::error::ClaudeError;
use crate::llm::retry::retry_with_backoff;

use super::subprocess::run_claude;

/// Trait for executing Claude CLI commands.
///
/// This abstraction allows mocking the Claude subprocess in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClaudeExecutor: Send + Sync {
    /// Run Claude with the given prompt and return the raw stdout.
    async fn run(&self, prompt: &str) -> Result<String, ClaudeError>;
}

/// Default executor that calls the real Claude CLI.
pub struct DefaultExecutor;

#[async_trait]
impl ClaudeExecutor for DefaultExecutor {
    async fn run(&self, prompt: &str) -> Result<String, ClaudeError> {
        run_claude(prompt).await
    }
}

/// Generate a text response, retrying with exponential backoff.
pub async fn generate_raw_with_retry(prompt: &str) -> Result<String, ClaudeError> {
    generate_raw_with_retry_impl(prompt, &DefaultExecutor).await
}

pub(crate) async fn generate_raw_with_retry_impl<E: ClaudeExecutor>(
    prompt: &str,
    executor: &E,
) -> Result<String, ClaudeError> {
    retry_with_backoff(
        || async {
            let stdout = executor.run(prompt).await?;
            unwrap_envelope(&stdout)
        },
        |e| ClaudeError::RetriesExhausted(Box::new(e)),
    )
    .await
}

/// Claude CLI JSON envelope when using `--output-format json`.
#[derive(serde::Deserialize)]
struct ClaudeCliResponse {
    result: String,
    #[serde(default)]
    is_error: bool,
}

/// The model's text from the CLI envelope; non-envelope output passes through.
fn unwrap_envelope(stdout: &str) -> Result<String, ClaudeError> {
    match serde_json::from_str::<ClaudeCliResponse>(stdout) {
        Ok(envelope) if envelope.is_error => Err(ClaudeError::ExecutionFailed(envelope.result)),
        Ok(envelope) => Ok(envelope.result),
        Err(_) => Ok(stdout.to_string()),
    }
}
