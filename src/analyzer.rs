//! The release analysis pipeline.
//!
//! latest tag → commits since it → changed files → bump decision (AI or
//! rule-based) → next version → release notes.

use git2::{Oid, Repository};
use semver::Version;
use tracing::{debug, info};

use crate::config::{AiMode, AnalyzerConfig};
use crate::error::GitError;
use crate::git::{
    collect_changed_files, fetch_commits_since, get_latest_release_tag, github_web_url,
    origin_url, ChangedFileSet, TagInfo,
};
use crate::llm::{available_providers, LlmRouter, Provider, ProviderSelection};
use crate::release_notes::generate_release_notes;
use crate::version::{
    analyze_release, apply_bump_to_version, base_version_from_tag, AnalysisSource, BumpDecision,
};

/// A release worth cutting, with everything needed to publish it.
#[derive(Debug, Clone)]
pub struct ReleasePlan {
    pub decision: BumpDecision,
    pub source: AnalysisSource,
    pub changed_files: ChangedFileSet,
    pub new_version: Version,
    pub release_notes: String,
}

/// Result of one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub latest_tag: Option<TagInfo>,
    pub commit_count: usize,
    /// `None` when there were no commits and no forced release.
    pub plan: Option<ReleasePlan>,
}

impl AnalysisReport {
    pub fn should_release(&self) -> bool {
        self.plan
            .as_ref()
            .is_some_and(|plan| plan.decision.should_release)
    }

    /// CI outputs in write order.
    pub fn outputs(&self) -> Vec<(&'static str, String)> {
        let Some(plan) = &self.plan else {
            return vec![("should_release", "false".to_string())];
        };

        vec![
            ("should_release", plan.decision.should_release.to_string()),
            ("version_bump", plan.decision.version_bump.to_string()),
            ("analysis_reasoning", plan.decision.reasoning.clone()),
            ("new_version", plan.new_version.to_string()),
            ("changelog_entry", plan.decision.changelog_entry.clone()),
            ("release_notes", plan.release_notes.clone()),
        ]
    }
}

/// Runs the analysis for one repository.
pub struct ReleaseAnalyzer {
    config: AnalyzerConfig,
    llm: Option<LlmRouter>,
    verbose: bool,
}

impl ReleaseAnalyzer {
    /// Analyzer using the provider CLIs found on `PATH`, per `config.ai`.
    pub fn new(config: AnalyzerConfig) -> Self {
        let llm = match config.ai {
            AiMode::Disabled => None,
            AiMode::Auto(selection) => router_for(selection, &available_providers()),
        };
        Self::with_router(config, llm)
    }

    /// Analyzer with an explicit router, or none for rule-based analysis.
    pub fn with_router(config: AnalyzerConfig, llm: Option<LlmRouter>) -> Self {
        Self {
            config,
            llm,
            verbose: false,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn uses_ai(&self) -> bool {
        self.llm.is_some()
    }

    pub async fn run(&mut self) -> Result<AnalysisReport, GitError> {
        let repo =
            Repository::open(&self.config.repo_path).map_err(GitError::OpenRepository)?;

        let latest_tag = get_latest_release_tag(&repo)?;
        match &latest_tag {
            Some(tag) => info!(tag = %tag.name, "Analyzing changes since latest release"),
            None => info!("No release tag found; analyzing full history"),
        }

        let commits = fetch_commits_since(&repo, latest_tag.as_ref().map(|t| t.oid))?;
        if commits.is_empty() && !self.config.force_release {
            info!("No commits since last release");
            return Ok(AnalysisReport {
                latest_tag,
                commit_count: 0,
                plan: None,
            });
        }

        let oids = commits
            .iter()
            .map(|c| Oid::from_str(&c.hash).map_err(GitError::ParseCommit))
            .collect::<Result<Vec<_>, _>>()?;
        let changed_files = collect_changed_files(&repo, &oids)?;

        let (mut decision, source) =
            analyze_release(&commits, &changed_files, self.llm.as_mut(), self.verbose).await;
        if self.config.force_release && !decision.should_release {
            info!("Release forced");
            decision.should_release = true;
        }

        let base = base_version_from_tag(latest_tag.as_ref());
        let new_version = apply_bump_to_version(Some(&base), decision.version_bump);
        info!(
            from = %base,
            to = %new_version,
            bump = %decision.version_bump,
            source = %source,
            "Release analysis complete"
        );

        let mut notes = self.config.notes.clone();
        if notes.repo_url.is_none() {
            notes.repo_url = origin_url(&repo)
                .ok()
                .flatten()
                .and_then(|url| github_web_url(&url));
        }

        let release_notes = generate_release_notes(
            &decision,
            &format!("v{}", new_version),
            &notes,
            self.llm.as_mut(),
        )
        .await;

        Ok(AnalysisReport {
            latest_tag,
            commit_count: commits.len(),
            plan: Some(ReleasePlan {
                decision,
                source,
                changed_files,
                new_version,
                release_notes,
            }),
        })
    }
}

/// Router over the installed providers, keeping the preferred one first.
fn router_for(selection: ProviderSelection, available: &[Provider]) -> Option<LlmRouter> {
    let Some(&first) = available.first() else {
        info!("No AI provider CLI found; using rule-based analysis");
        return None;
    };

    let selection = if available.contains(&selection.primary) {
        selection
    } else {
        debug!(preferred = %selection.primary, using = %first, "Preferred provider not installed");
        ProviderSelection::from_primary(first)
    };
    Some(LlmRouter::new(selection))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_for_without_providers() {
        assert!(router_for(ProviderSelection::default(), &[]).is_none());
    }

    #[test]
    fn test_router_for_keeps_installed_preference() {
        let router = router_for(
            ProviderSelection::from_primary(Provider::Codex),
            &[Provider::Claude, Provider::Codex],
        )
        .unwrap();
        assert_eq!(router.primary(), Provider::Codex);
        assert_eq!(router.fallback(), Provider::Claude);
    }

    #[test]
    fn test_router_for_switches_to_installed() {
        let router = router_for(ProviderSelection::default(), &[Provider::Codex]).unwrap();
        assert_eq!(router.primary(), Provider::Codex);
    }

    #[test]
    fn test_outputs_without_plan() {
        let report = AnalysisReport {
            latest_tag: None,
            commit_count: 0,
            plan: None,
        };
        assert!(!report.should_release());
        assert_eq!(
            report.outputs(),
            vec![("should_release", "false".to_string())]
        );
    }
}
