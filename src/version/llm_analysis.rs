//! AI-assisted release analysis.
//!
//! Asks an LLM provider for a [`BumpDecision`]. Falls back to the rule-based
//! classifier on any failure, so this never fails.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::git::{ChangedFileSet, CommitRecord, FileCategory};
use crate::llm::json::parse_response;
use crate::llm::{sanitize_for_prompt, LlmRouter, Provider};

use super::bump::BumpType;
use super::classifier::classify;
use super::decision::{render_changelog_entry, truncate_listed, BumpDecision};

/// Commit summaries included in the prompt.
const MAX_PROMPT_COMMITS: usize = 50;

/// Task file paths included in the prompt.
const MAX_PROMPT_TASK_FILES: usize = 10;

/// Where a decision came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisSource {
    Ai(Provider),
    RuleBased,
}

impl std::fmt::Display for AnalysisSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisSource::Ai(provider) => write!(f, "{}", provider),
            AnalysisSource::RuleBased => f.write_str("rule-based analysis"),
        }
    }
}

/// Provider response. Everything but the bump level is optional.
#[derive(Deserialize)]
struct ReleaseAnalysisResponse {
    version_bump: BumpType,
    should_release: Option<bool>,
    reasoning: Option<String>,
    #[serde(default)]
    breaking_changes: Vec<String>,
    #[serde(default)]
    new_features: Vec<String>,
    #[serde(default)]
    bug_fixes: Vec<String>,
    changelog_entry: Option<String>,
}

/// Build the release analysis prompt.
pub fn build_release_prompt(commits: &[CommitRecord], changed_files: &ChangedFileSet) -> String {
    let commit_lines: Vec<String> = commits
        .iter()
        .take(MAX_PROMPT_COMMITS)
        .map(|c| format!("- {}", sanitize_for_prompt(&c.summary)))
        .collect();

    let change_lines: Vec<String> = changed_files
        .counts()
        .into_iter()
        .map(|(category, count)| format!("{}: {} files changed", category, count))
        .collect();

    let task_files: Vec<String> = changed_files
        .get(FileCategory::Tasks)
        .take(MAX_PROMPT_TASK_FILES)
        .map(sanitize_for_prompt)
        .collect();

    format!(
        r#"Analyze these changes to an Ansible role and determine the appropriate semantic version bump.

Recent commits:
{commits}

File changes by category:
{changes}

Changed files in tasks (core functionality):
{tasks}

Rules for semantic versioning:
- PATCH: Bug fixes, documentation, minor improvements
- MINOR: New features, new variables (with defaults), new OS support
- MAJOR: Breaking changes, removed features, changed defaults, dropped OS support

Analyze the commits for:
1. Breaking changes (removed vars, changed behavior, dropped support)
2. New features (new functionality, new OS support)
3. Bug fixes
4. Whether a release is warranted

Respond with JSON only:
{{
    "should_release": true,
    "version_bump": "major|minor|patch",
    "reasoning": "Brief explanation",
    "breaking_changes": ["list of breaking changes if any"],
    "new_features": ["list of new features"],
    "bug_fixes": ["list of bug fixes"],
    "changelog_entry": "Formatted changelog entry text"
}}"#,
        commits = or_none(&commit_lines),
        changes = or_none(&change_lines),
        tasks = or_none(&task_files),
    )
}

fn or_none(lines: &[String]) -> String {
    if lines.is_empty() {
        "(none)".to_string()
    } else {
        lines.join("\n")
    }
}

/// Parse a provider response into a decision.
///
/// Lists are cut to five entries. Missing text fields are filled in the same
/// way the rule-based classifier fills them.
fn parse_release_response(response: &str, commit_count: usize) -> Option<BumpDecision> {
    let parsed: ReleaseAnalysisResponse = match parse_response(response) {
        Ok(v) => v,
        Err(e) => {
            debug!("Failed to parse release analysis JSON: {}", e);
            return None;
        }
    };

    let breaking_changes = truncate_listed(parsed.breaking_changes);
    let new_features = truncate_listed(parsed.new_features);
    let bug_fixes = truncate_listed(parsed.bug_fixes);

    let changelog_entry = parsed
        .changelog_entry
        .filter(|entry| !entry.trim().is_empty())
        .unwrap_or_else(|| render_changelog_entry(&breaking_changes, &new_features, &bug_fixes));

    let reasoning = parsed
        .reasoning
        .filter(|r| !r.trim().is_empty())
        .unwrap_or_else(|| {
            format!(
                "Found {} commits with {} level changes",
                commit_count, parsed.version_bump
            )
        });

    Some(BumpDecision {
        should_release: parsed.should_release.unwrap_or(commit_count > 0),
        version_bump: parsed.version_bump,
        reasoning,
        breaking_changes,
        new_features,
        bug_fixes,
        changelog_entry,
    })
}

/// Decide the release, using `llm` when given and the classifier otherwise.
///
/// Provider failures and unparseable responses are reported on stderr and
/// resolved with the rule-based decision.
pub async fn analyze_release(
    commits: &[CommitRecord],
    changed_files: &ChangedFileSet,
    llm: Option<&mut LlmRouter>,
    verbose: bool,
) -> (BumpDecision, AnalysisSource) {
    let Some(llm) = llm else {
        return (classify(commits, changed_files), AnalysisSource::RuleBased);
    };

    let prompt = build_release_prompt(commits, changed_files);

    let completion = match llm.generate_raw(&prompt).await {
        Ok(completion) => completion,
        Err(e) => {
            warn!("AI release analysis failed: {}. Using rule-based analysis.", e.summary());
            eprintln!();
            eprintln!("\x1b[33m⚠ AI analysis failed, using rule-based analysis\x1b[0m");
            if verbose {
                eprintln!("  Details: {}", e.detailed());
            } else {
                eprintln!("  Reason: {}", e.summary());
            }
            eprintln!();
            return (classify(commits, changed_files), AnalysisSource::RuleBased);
        }
    };

    if let Some(ref primary_err) = completion.primary_error {
        eprintln!(
            "\x1b[33m⚠ {} failed, using {} for release analysis\x1b[0m",
            primary_err.provider(),
            completion.provider
        );
        if verbose {
            eprintln!("  Details: {}", primary_err.detail());
        } else {
            eprintln!("  Reason: {}", primary_err.summary());
        }
    }

    match parse_release_response(&completion.output, commits.len()) {
        Some(decision) => {
            debug!(bump = %decision.version_bump, "AI release analysis: {}", decision.reasoning);
            (decision, AnalysisSource::Ai(completion.provider))
        }
        None => {
            warn!(
                "Could not parse AI release analysis. Using rule-based analysis. Response: {}",
                completion.output.chars().take(200).collect::<String>()
            );
            eprintln!();
            eprintln!(
                "\x1b[33m⚠ Could not parse AI release analysis, using rule-based analysis\x1b[0m"
            );
            eprintln!();
            (classify(commits, changed_files), AnalysisSource::RuleBased)
        }
    }
}
