//! Exponential backoff retry logic for Codex CLI.

use async_trait::async_trait;

use crate::error::CodexError;
use crate::llm::retry::retry_with_backoff;

use super::subprocess::run_codex;

/// Trait for executing Codex CLI commands.
///
/// This abstraction allows mocking the Codex subprocess in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CodexExecutor: Send + Sync {
    /// Run Codex with the given prompt and return the raw response.
    async fn run(&self, prompt: &str) -> Result<String, CodexError>;
}

/// Default executor that calls the real Codex CLI.
pub struct DefaultExecutor;

#[async_trait]
impl CodexExecutor for DefaultExecutor {
    async fn run(&self, prompt: &str) -> Result<String, CodexError> {
        run_codex(prompt).await
    }
}

/// Generate a text response, retrying with exponential backoff.
pub async fn generate_raw_with_retry(prompt: &str) -> Result<String, CodexError> {
    generate_raw_with_retry_impl(prompt, &DefaultExecutor).await
}

pub(crate) async fn generate_raw_with_retry_impl<E: CodexExecutor>(
    prompt: &str,
    executor: &E,
) -> Result<String, CodexError> {
    retry_with_backoff(
        || async {
            let output = executor.run(prompt).await?;
            if output.trim().is_empty() {
                return Err(CodexError::ExecutionFailed(
                    "Codex returned an empty response".to_string(),
                ));
            }
            Ok(output)
        },
        |e| CodexError::RetriesExhausted(Box::new(e)),
    )
    .await
}
