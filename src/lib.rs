//! role-release - Release analysis for Ansible role repositories.
//!
//! # Overview
//!
//! role-release looks at the commits since the latest release tag, decides
//! whether a release is due and how large the semantic version bump should be,
//! and produces a changelog entry and release notes. Claude Code or Codex CLI
//! do the analysis when installed; a keyword classifier is the fallback.
//! Results are written as CI step outputs (`$GITHUB_OUTPUT`), and
//! `CHANGELOG.md` can be updated in Keep a Changelog format.

pub mod analyzer;
pub mod changelog;
pub mod claude;
pub mod codex;
pub mod config;
pub mod error;
pub mod git;
pub mod llm;
pub mod output;
pub mod release_notes;
pub mod version;

// Re-export commonly used types
pub use analyzer::{AnalysisReport, ReleaseAnalyzer, ReleasePlan};
pub use changelog::{update_changelog, ChangelogUpdate};
pub use config::{AiMode, AnalyzerConfig, ReleaseNotesSettings};
pub use error::{ChangelogError, ClaudeError, CodexError, GitError, OutputError, VersionError};
pub use git::{ChangedFileSet, CommitRecord, FileCategory};
pub use llm::{LlmRouter, Provider, ProviderSelection};
pub use output::OutputSink;
pub use version::{classify, AnalysisSource, BumpDecision, BumpType};
