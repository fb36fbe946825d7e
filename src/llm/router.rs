//! Provider selection and fallback orchestration.

use std::fmt;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::claude;
use crate::codex;
use crate::error::{ClaudeError, CodexError};

/// Supported LLM providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Provider {
    Claude,
    Codex,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Claude => "Claude",
            Provider::Codex => "Codex",
        }
    }

    /// Name of the provider's CLI executable.
    pub fn executable(&self) -> &'static str {
        match self {
            Provider::Claude => "claude",
            Provider::Codex => "codex",
        }
    }

    pub fn other(&self) -> Provider {
        match self {
            Provider::Claude => Provider::Codex,
            Provider::Codex => Provider::Claude,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Primary + fallback selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderSelection {
    pub primary: Provider,
    pub fallback: Provider,
}

impl ProviderSelection {
    pub fn from_primary(primary: Provider) -> Self {
        Self {
            primary,
            fallback: primary.other(),
        }
    }
}

impl Default for ProviderSelection {
    fn default() -> Self {
        ProviderSelection::from_primary(Provider::Claude)
    }
}

/// Providers whose CLI is on `PATH`, Claude first.
pub fn available_providers() -> Vec<Provider> {
    [Provider::Claude, Provider::Codex]
        .into_iter()
        .filter(|p| which::which(p.executable()).is_ok())
        .collect()
}

/// Provider-specific error wrapper.
#[derive(Debug)]
pub enum LlmProviderError {
    Claude(ClaudeError),
    Codex(CodexError),
}

impl LlmProviderError {
    pub fn provider(&self) -> Provider {
        match self {
            LlmProviderError::Claude(_) => Provider::Claude,
            LlmProviderError::Codex(_) => Provider::Codex,
        }
    }

    pub fn summary(&self) -> String {
        match self {
            LlmProviderError::Claude(err) => summarize_claude_error(err),
            LlmProviderError::Codex(err) => summarize_codex_error(err),
        }
    }

    pub fn detail(&self) -> String {
        match self {
            LlmProviderError::Claude(err) => err.to_string(),
            LlmProviderError::Codex(err) => err.to_string(),
        }
    }
}

impl fmt::Display for LlmProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

impl std::error::Error for LlmProviderError {}

impl From<ClaudeError> for LlmProviderError {
    fn from(err: ClaudeError) -> Self {
        LlmProviderError::Claude(err)
    }
}

impl From<CodexError> for LlmProviderError {
    fn from(err: CodexError) -> Self {
        LlmProviderError::Codex(err)
    }
}

/// Both providers failed.
#[derive(Debug)]
pub enum LlmError {
    AllProvidersFailed {
        primary: Provider,
        primary_error: LlmProviderError,
        fallback: Provider,
        fallback_error: LlmProviderError,
    },
}

impl LlmError {
    pub fn summary(&self) -> String {
        match self {
            LlmError::AllProvidersFailed {
                primary,
                primary_error,
                fallback,
                fallback_error,
            } => format!(
                "Both LLM providers failed. {} error: {}. {} error: {}.",
                primary,
                primary_error.summary(),
                fallback,
                fallback_error.summary()
            ),
        }
    }

    pub fn detailed(&self) -> String {
        match self {
            LlmError::AllProvidersFailed {
                primary,
                primary_error,
                fallback,
                fallback_error,
            } => format!(
                "Both LLM providers failed. {} error: {}. {} error: {}.",
                primary,
                primary_error.detail(),
                fallback,
                fallback_error.detail()
            ),
        }
    }
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

impl std::error::Error for LlmError {}

/// Successful generation with metadata.
#[derive(Debug)]
pub struct LlmCompletion {
    pub output: String,
    pub provider: Provider,
    pub primary_error: Option<LlmProviderError>,
}

/// Runs a prompt against one provider.
#[async_trait]
pub trait ProviderRunner: Send + Sync {
    async fn run(&self, provider: Provider, prompt: &str) -> Result<String, LlmProviderError>;
}

/// Runner backed by the real provider CLIs, with retries.
pub struct CliRunner;

#[async_trait]
impl ProviderRunner for CliRunner {
    async fn run(&self, provider: Provider, prompt: &str) -> Result<String, LlmProviderError> {
        match provider {
            Provider::Claude => claude::generate_raw_with_retry(prompt)
                .await
                .map_err(LlmProviderError::from),
            Provider::Codex => codex::generate_raw_with_retry(prompt)
                .await
                .map_err(LlmProviderError::from),
        }
    }
}

/// Provider router with fallback and stickiness.
///
/// After the fallback succeeds it becomes the primary for later calls.
pub struct LlmRouter {
    primary: Provider,
    fallback: Provider,
    runner: Box<dyn ProviderRunner>,
}

impl LlmRouter {
    pub fn new(selection: ProviderSelection) -> Self {
        Self::with_runner(selection, CliRunner)
    }

    pub fn with_runner(selection: ProviderSelection, runner: impl ProviderRunner + 'static) -> Self {
        Self {
            primary: selection.primary,
            fallback: selection.fallback,
            runner: Box::new(runner),
        }
    }

    pub fn primary(&self) -> Provider {
        self.primary
    }

    pub fn fallback(&self) -> Provider {
        self.fallback
    }

    /// Run `prompt` on the primary provider, then the fallback.
    pub async fn generate_raw(&mut self, prompt: &str) -> Result<LlmCompletion, LlmError> {
        let primary = self.primary;
        let fallback = self.fallback;

        let primary_error = match self.runner.run(primary, prompt).await {
            Ok(output) => {
                debug!(provider = %primary, "LLM generation succeeded");
                return Ok(LlmCompletion {
                    output,
                    provider: primary,
                    primary_error: None,
                });
            }
            Err(e) => e,
        };

        warn!(
            provider = %primary,
            error = %primary_error.summary(),
            "Primary LLM provider failed, trying {}",
            fallback
        );

        match self.runner.run(fallback, prompt).await {
            Ok(output) => {
                self.primary = fallback;
                self.fallback = primary;
                Ok(LlmCompletion {
                    output,
                    provider: fallback,
                    primary_error: Some(primary_error),
                })
            }
            Err(fallback_error) => Err(LlmError::AllProvidersFailed {
                primary,
                primary_error,
                fallback,
                fallback_error,
            }),
        }
    }
}

fn summarize_claude_error(err: &ClaudeError) -> String {
    match err {
        ClaudeError::NotInstalled => "Claude CLI not found".to_string(),
        ClaudeError::ExecutionFailed(_) => "Claude CLI reported an error".to_string(),
        ClaudeError::SpawnFailed(_) => "Failed to start Claude CLI".to_string(),
        ClaudeError::Timeout(secs) => format!("Claude timed out after {}s", secs),
        ClaudeError::NonZeroExit { code, .. } => format!("Claude CLI exited with code {}", code),
        ClaudeError::RetriesExhausted(_) => "Claude failed after retries".to_string(),
    }
}

fn summarize_codex_error(err: &CodexError) -> String {
    match err {
        CodexError::NotInstalled => "Codex CLI not found".to_string(),
        CodexError::ExecutionFailed(_) => "Codex CLI reported an error".to_string(),
        CodexError::SpawnFailed(_) => "Failed to start Codex CLI".to_string(),
        CodexError::Timeout(secs) => format!("Codex timed out after {}s", secs),
        CodexError::NonZeroExit { code, .. } => format!("Codex CLI exited with code {}", code),
        CodexError::RetriesExhausted(_) => "Codex failed after retries".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeRunner {
        claude_ok: bool,
        codex_ok: bool,
    }

    #[async_trait]
    impl ProviderRunner for FakeRunner {
        async fn run(&self, provider: Provider, _prompt: &str) -> Result<String, LlmProviderError> {
            match provider {
                Provider::Claude if self.claude_ok => Ok("from claude".to_string()),
                Provider::Codex if self.codex_ok => Ok("from codex".to_string()),
                Provider::Claude => Err(LlmProviderError::Claude(ClaudeError::NotInstalled)),
                Provider::Codex => Err(LlmProviderError::Codex(CodexError::NotInstalled)),
            }
        }
    }

    fn router(claude_ok: bool, codex_ok: bool) -> LlmRouter {
        LlmRouter::with_runner(
            ProviderSelection::default(),
            FakeRunner {
                claude_ok,
                codex_ok,
            },
        )
    }

    #[test]
    fn default_selection_is_claude_then_codex() {
        let selection = ProviderSelection::default();
        assert_eq!(selection.primary, Provider::Claude);
        assert_eq!(selection.fallback, Provider::Codex);
    }

    #[test]
    fn codex_selection_sets_fallback_to_claude() {
        let selection = ProviderSelection::from_primary(Provider::Codex);
        assert_eq!(selection.primary, Provider::Codex);
        assert_eq!(selection.fallback, Provider::Claude);
    }

    #[tokio::test]
    async fn generate_succeeds_on_primary() {
        let mut router = router(true, true);
        let completion = router.generate_raw("test").await.unwrap();
        assert_eq!(completion.provider, Provider::Claude);
        assert_eq!(completion.output, "from claude");
        assert!(completion.primary_error.is_none());
    }

    #[tokio::test]
    async fn router_swaps_primary_after_fallback_success() {
        let mut router = router(false, true);

        let completion = router.generate_raw("test").await.unwrap();
        assert_eq!(completion.provider, Provider::Codex);
        assert_eq!(
            completion.primary_error.map(|e| e.provider()),
            Some(Provider::Claude)
        );
        assert_eq!(router.primary(), Provider::Codex);
        assert_eq!(router.fallback(), Provider::Claude);
    }

    #[tokio::test]
    async fn generate_fails_when_both_fail() {
        let mut router = router(false, false);

        let err = router.generate_raw("test").await.unwrap_err();
        assert!(err.summary().contains("Claude CLI not found"));
        assert!(err.summary().contains("Codex CLI not found"));
        assert_eq!(router.primary(), Provider::Claude);
    }

    #[test]
    fn provider_executables() {
        assert_eq!(Provider::Claude.executable(), "claude");
        assert_eq!(Provider::Codex.executable(), "codex");
    }
}
