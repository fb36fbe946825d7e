//! Categorization of the files touched by a set of commits.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use git2::{Oid, Repository};
use tracing::debug;

use crate::error::GitError;

/// Coarse category of a role file, by leading path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FileCategory {
    Tasks,
    Vars,
    Defaults,
    Meta,
    Tests,
    Docs,
    Ci,
    Other,
}

impl FileCategory {
    pub const ALL: [FileCategory; 8] = [
        FileCategory::Tasks,
        FileCategory::Vars,
        FileCategory::Defaults,
        FileCategory::Meta,
        FileCategory::Tests,
        FileCategory::Docs,
        FileCategory::Ci,
        FileCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Tasks => "tasks",
            FileCategory::Vars => "vars",
            FileCategory::Defaults => "defaults",
            FileCategory::Meta => "meta",
            FileCategory::Tests => "tests",
            FileCategory::Docs => "docs",
            FileCategory::Ci => "ci",
            FileCategory::Other => "other",
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Categorize a repository-relative path.
pub fn categorize_path(path: &str) -> FileCategory {
    if path.starts_with("tasks/") {
        FileCategory::Tasks
    } else if path.starts_with("vars/") {
        FileCategory::Vars
    } else if path.starts_with("defaults/") {
        FileCategory::Defaults
    } else if path.starts_with("meta/") {
        FileCategory::Meta
    } else if path.starts_with("tests/") || path.starts_with("molecule/") {
        FileCategory::Tests
    } else if path.ends_with(".md") || path.starts_with("docs/") {
        FileCategory::Docs
    } else if path.starts_with(".github/") {
        FileCategory::Ci
    } else {
        FileCategory::Other
    }
}

/// Changed paths grouped by category, deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangedFileSet {
    files: BTreeMap<FileCategory, BTreeSet<String>>,
}

impl ChangedFileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a path under its category.
    pub fn insert(&mut self, path: impl Into<String>) {
        let path = path.into();
        let category = categorize_path(&path);
        self.files.entry(category).or_default().insert(path);
    }

    /// Paths in a category, sorted.
    pub fn get(&self, category: FileCategory) -> impl Iterator<Item = &str> {
        self.files
            .get(&category)
            .into_iter()
            .flat_map(|paths| paths.iter().map(String::as_str))
    }

    pub fn count(&self, category: FileCategory) -> usize {
        self.files.get(&category).map_or(0, BTreeSet::len)
    }

    pub fn has_any(&self, category: FileCategory) -> bool {
        self.count(category) > 0
    }

    pub fn is_empty(&self) -> bool {
        self.files.values().all(BTreeSet::is_empty)
    }

    /// Non-empty categories with their file counts, in category order.
    pub fn counts(&self) -> Vec<(FileCategory, usize)> {
        FileCategory::ALL
            .iter()
            .map(|c| (*c, self.count(*c)))
            .filter(|(_, n)| *n > 0)
            .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for ChangedFileSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = ChangedFileSet::new();
        for path in iter {
            set.insert(path);
        }
        set
    }
}

/// Collect the paths changed by each commit, diffed against its first parent.
///
/// Root commits are diffed against the empty tree.
pub fn collect_changed_files(
    repo: &Repository,
    commit_ids: &[Oid],
) -> Result<ChangedFileSet, GitError> {
    let mut changes = ChangedFileSet::new();

    for oid in commit_ids {
        let diff_err = |source| GitError::DiffFailed {
            hash: oid.to_string(),
            source,
        };

        let commit = repo.find_commit(*oid).map_err(GitError::ParseCommit)?;
        let tree = commit.tree().map_err(diff_err)?;
        let parent_tree = match commit.parent(0) {
            Ok(parent) => Some(parent.tree().map_err(diff_err)?),
            Err(_) => None,
        };

        let diff = repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)
            .map_err(diff_err)?;

        for delta in diff.deltas() {
            let path = delta
                .old_file()
                .path()
                .or_else(|| delta.new_file().path())
                .and_then(|p| p.to_str());
            if let Some(path) = path {
                changes.insert(path);
            }
        }
    }

    debug!(categories = ?changes.counts(), "Collected changed files");
    Ok(changes)
}
