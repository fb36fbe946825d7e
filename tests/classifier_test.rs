//! Integration tests for rule-based release classification.

mod common;

use common::commits;
use role_release::git::ChangedFileSet;
use role_release::version::decision::PLACEHOLDER_CHANGELOG;
use role_release::version::{classify, BumpType};

#[test]
fn test_empty_input_means_no_release() {
    let decision = classify(&[], &ChangedFileSet::new());

    assert!(!decision.should_release);
    assert_eq!(decision.version_bump, BumpType::Patch);
    assert_eq!(decision.changelog_entry, PLACEHOLDER_CHANGELOG);
    assert!(decision.breaking_changes.is_empty());
    assert!(decision.new_features.is_empty());
    assert!(decision.bug_fixes.is_empty());
}

#[test]
fn test_feature_and_fix_with_defaults_change() {
    let commits = commits(&["feat: add new os support", "fix: typo in readme"]);
    let files: ChangedFileSet = ["defaults/main.yml"].into_iter().collect();

    let decision = classify(&commits, &files);

    assert!(decision.should_release);
    assert_eq!(decision.version_bump, BumpType::Minor);
    assert_eq!(decision.new_features, vec!["feat: add new os support"]);
    assert_eq!(decision.bug_fixes, vec!["fix: typo in readme"]);
    assert!(decision.breaking_changes.is_empty());
    assert_eq!(
        decision.changelog_entry,
        "### Added\n- feat: add new os support\n\n### Fixed\n- fix: typo in readme"
    );
}

#[test]
fn test_breaking_is_not_downgraded_by_later_feature() {
    let commits = commits(&["breaking: remove centos7 support", "feat: add rocky9"]);

    let decision = classify(&commits, &ChangedFileSet::new());

    assert_eq!(decision.version_bump, BumpType::Major);
    assert_eq!(
        decision.breaking_changes,
        vec!["breaking: remove centos7 support"]
    );
    assert_eq!(decision.new_features, vec!["feat: add rocky9"]);
}

#[test]
fn test_major_holds_regardless_of_position() {
    let orders = [
        ["feat: add alma", "fix: bug in handler", "drop support for el6"],
        ["drop support for el6", "feat: add alma", "fix: bug in handler"],
        ["fix: bug in handler", "drop support for el6", "feat: add alma"],
    ];

    for order in orders {
        let decision = classify(&commits(&order), &ChangedFileSet::new());
        assert_eq!(decision.version_bump, BumpType::Major, "order: {:?}", order);
    }
}

#[test]
fn test_fix_only_commits_stay_patch() {
    let commits = commits(&["fix: handler name", "repair firewall rule", "correct typo"]);

    let decision = classify(&commits, &ChangedFileSet::new());

    assert_eq!(decision.version_bump, BumpType::Patch);
    assert_eq!(decision.bug_fixes.len(), 3);
    assert!(decision.should_release);
}

#[test]
fn test_vars_change_escalates_to_minor_without_keywords() {
    let commits = commits(&["chore: tidy up"]);
    let files: ChangedFileSet = ["vars/RedHat-9.yml"].into_iter().collect();

    let decision = classify(&commits, &files);

    assert_eq!(decision.version_bump, BumpType::Minor);
    assert_eq!(decision.changelog_entry, PLACEHOLDER_CHANGELOG);
}

#[test]
fn test_config_change_does_not_touch_major() {
    let commits = commits(&["remove deprecated variable"]);
    let files: ChangedFileSet = ["defaults/main.yml"].into_iter().collect();

    let decision = classify(&commits, &files);
    assert_eq!(decision.version_bump, BumpType::Major);
}

#[test]
fn test_other_categories_do_not_escalate() {
    let commits = commits(&["chore: ci"]);
    let files: ChangedFileSet = [
        "tasks/main.yml",
        "meta/main.yml",
        ".github/workflows/ci.yml",
        "README.md",
    ]
    .into_iter()
    .collect();

    let decision = classify(&commits, &files);
    assert_eq!(decision.version_bump, BumpType::Patch);
}

#[test]
fn test_feature_list_is_truncated_to_first_five() {
    let messages: Vec<String> = (1..=7).map(|i| format!("feat: feature {}", i)).collect();
    let refs: Vec<&str> = messages.iter().map(String::as_str).collect();

    let decision = classify(&commits(&refs), &ChangedFileSet::new());

    assert_eq!(
        decision.new_features,
        vec![
            "feat: feature 1",
            "feat: feature 2",
            "feat: feature 3",
            "feat: feature 4",
            "feat: feature 5",
        ]
    );
    assert_eq!(decision.reasoning, "Found 7 commits with minor level changes");
}

#[test]
fn test_each_commit_counted_once() {
    let commits = commits(&["fix: breaking change in bug handler"]);

    let decision = classify(&commits, &ChangedFileSet::new());

    assert_eq!(decision.breaking_changes.len(), 1);
    assert!(decision.new_features.is_empty());
    assert!(decision.bug_fixes.is_empty());
}

#[test]
fn test_classification_is_deterministic() {
    let commits = commits(&["feat: a", "fix: b", "docs only"]);
    let files: ChangedFileSet = ["docs/index.md"].into_iter().collect();

    assert_eq!(classify(&commits, &files), classify(&commits, &files));
}
