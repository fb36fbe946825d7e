//! Rule-based release classification.
//!
//! This is the fallback for AI analysis, so it is total: every input yields
//! a [`BumpDecision`] and nothing here can fail.
//!
//! Each commit is checked against an ordered list of keyword rules. The first
//! rule whose keywords occur in the lower-cased message decides the commit's
//! category, so a commit is counted at most once. The bump level only ever
//! rises during a pass.

use tracing::debug;

use crate::git::{ChangedFileSet, CommitRecord, FileCategory};

use super::bump::BumpType;
use super::decision::{render_changelog_entry, truncate_listed, BumpDecision};

/// Category a commit is counted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Breaking,
    Feature,
    Fix,
}

impl ChangeKind {
    /// Bump level after seeing a commit of this kind.
    pub fn escalate(self, current: BumpType) -> BumpType {
        match self {
            ChangeKind::Breaking => BumpType::Major,
            ChangeKind::Feature => current.max(BumpType::Minor),
            ChangeKind::Fix => current,
        }
    }
}

/// A keyword rule: any keyword as a substring of the lower-cased message.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    pub kind: ChangeKind,
    pub keywords: &'static [&'static str],
}

impl KeywordRule {
    pub fn matches(&self, lowered_message: &str) -> bool {
        self.keywords.iter().any(|kw| lowered_message.contains(kw))
    }
}

/// Rules in priority order.
pub const RULES: [KeywordRule; 3] = [
    KeywordRule {
        kind: ChangeKind::Breaking,
        keywords: &["breaking", "remove", "drop support"],
    },
    KeywordRule {
        kind: ChangeKind::Feature,
        keywords: &["feat:", "feature", "add support", "new"],
    },
    KeywordRule {
        kind: ChangeKind::Fix,
        keywords: &["fix:", "bug", "repair", "correct"],
    },
];

/// Category of a single commit message, first matching rule wins.
pub fn match_commit(message: &str) -> Option<ChangeKind> {
    let lowered = message.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map(|rule| rule.kind)
}

/// Decide release, bump level and changelog from commits and changed files.
///
/// `commits` are expected most-recent-first; list order in the result follows
/// input order. `should_release` is true iff there is at least one commit.
pub fn classify(commits: &[CommitRecord], changed_files: &ChangedFileSet) -> BumpDecision {
    let mut bump = BumpType::Patch;
    let mut breaking = Vec::new();
    let mut features = Vec::new();
    let mut fixes = Vec::new();

    for commit in commits {
        let Some(kind) = match_commit(&commit.message) else {
            continue;
        };

        bump = kind.escalate(bump);
        let bucket = match kind {
            ChangeKind::Breaking => &mut breaking,
            ChangeKind::Feature => &mut features,
            ChangeKind::Fix => &mut fixes,
        };
        bucket.push(commit.summary.clone());
    }

    // New role variables usually arrive with defaults, which is additive.
    let config_changed = changed_files.has_any(FileCategory::Vars)
        || changed_files.has_any(FileCategory::Defaults);
    if config_changed && bump == BumpType::Patch {
        bump = BumpType::Minor;
    }

    let breaking = truncate_listed(breaking);
    let features = truncate_listed(features);
    let fixes = truncate_listed(fixes);
    let changelog_entry = render_changelog_entry(&breaking, &features, &fixes);

    debug!(
        commits = commits.len(),
        bump = %bump,
        breaking = breaking.len(),
        features = features.len(),
        fixes = fixes.len(),
        "Rule-based classification complete"
    );

    BumpDecision {
        should_release: !commits.is_empty(),
        version_bump: bump,
        reasoning: format!("Found {} commits with {} level changes", commits.len(), bump),
        breaking_changes: breaking,
        new_features: features,
        bug_fixes: fixes,
        changelog_entry,
    }
}
