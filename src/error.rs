//! Error types for role-release modules using thiserror.

use thiserror::Error;

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to open repository: {0}")]
    OpenRepository(#[source] git2::Error),

    #[error("Failed to parse commit: {0}")]
    ParseCommit(#[source] git2::Error),

    #[error("Failed to walk commit history: {0}")]
    RevwalkError(#[source] git2::Error),

    #[error("Failed to diff commit {hash}: {source}")]
    DiffFailed {
        hash: String,
        #[source]
        source: git2::Error,
    },

    #[error("Failed to read remote '{0}': {1}")]
    RemoteNotFound(String, #[source] git2::Error),
}

/// Errors from Claude CLI operations.
#[derive(Error, Debug)]
pub enum ClaudeError {
    #[error("Claude Code CLI not found. Install with: npm install -g @anthropic-ai/claude-code")]
    NotInstalled,

    #[error("Claude Code CLI failed to execute: {0}")]
    ExecutionFailed(String),

    #[error("Failed to spawn Claude process: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("Claude process timed out after {0} seconds")]
    Timeout(u64),

    #[error("Claude CLI exited with code {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },

    #[error("All retry attempts failed: {0}")]
    RetriesExhausted(#[source] Box<ClaudeError>),
}

/// Errors from Codex CLI operations.
#[derive(Error, Debug)]
pub enum CodexError {
    #[error(
        "Codex CLI not found. Install with: npm install -g @openai/codex (then run `codex` or set CODEX_API_KEY)"
    )]
    NotInstalled,

    #[error("Codex CLI failed to execute: {0}")]
    ExecutionFailed(String),

    #[error("Failed to spawn Codex process: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("Codex process timed out after {0} seconds")]
    Timeout(u64),

    #[error("Codex CLI exited with code {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },

    #[error("All retry attempts failed: {0}")]
    RetriesExhausted(#[source] Box<CodexError>),
}

/// Errors from changelog operations.
#[derive(Error, Debug)]
pub enum ChangelogError {
    #[error("Failed to read changelog: {0}")]
    ReadFailed(#[source] std::io::Error),

    #[error("Failed to write changelog: {0}")]
    WriteFailed(#[source] std::io::Error),

    #[error("Failed to create backup: {0}")]
    BackupFailed(#[source] std::io::Error),

    #[error("Version {0} already exists in changelog")]
    VersionAlreadyExists(String),
}

/// Errors from version operations.
#[derive(Error, Debug)]
pub enum VersionError {
    #[error("Failed to parse version '{0}': {1}")]
    ParseFailed(String, #[source] semver::Error),
}

/// Errors from writing CI outputs.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to open CI output file {path}: {source}")]
    OpenFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write CI output: {0}")]
    WriteFailed(#[source] std::io::Error),

    #[error("Invalid output key '{0}': keys must be non-empty and contain no '=', '<' or newline")]
    InvalidKey(String),
}
