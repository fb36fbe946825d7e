//! Commit fetching.

use git2::{Commit, Oid, Repository};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GitError;

/// A commit as seen by release analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub hash: String,
    /// First line of the message.
    pub summary: String,
    pub message: String,
}

impl CommitRecord {
    /// Build a record from a bare message, deriving the summary from its first line.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let summary = first_line(&message);
        Self {
            hash: String::new(),
            summary,
            message,
        }
    }

    /// Create a CommitRecord from a git2 Commit.
    pub fn from_git2_commit(commit: &Commit) -> Self {
        let message = commit.message().unwrap_or("").to_string();
        let summary = commit
            .summary()
            .map(str::to_string)
            .unwrap_or_else(|| first_line(&message));

        Self {
            hash: commit.id().to_string(),
            summary,
            message,
        }
    }
}

fn first_line(message: &str) -> String {
    message.lines().next().unwrap_or("").trim().to_string()
}

/// Fetch commits reachable from HEAD that are not reachable from `since`.
///
/// Returned most-recent-first. With `since = None` every commit reachable
/// from HEAD is returned. A repository without HEAD yields no commits.
pub fn fetch_commits_since(
    repo: &Repository,
    since: Option<Oid>,
) -> Result<Vec<CommitRecord>, GitError> {
    let head_oid = match repo.head().ok().and_then(|head| head.target()) {
        Some(oid) => oid,
        None => {
            debug!("Repository has no HEAD; no commits to analyze");
            return Ok(Vec::new());
        }
    };

    let mut revwalk = repo.revwalk().map_err(GitError::RevwalkError)?;
    revwalk
        .set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)
        .map_err(GitError::RevwalkError)?;
    revwalk.push(head_oid).map_err(GitError::RevwalkError)?;
    if let Some(since) = since {
        revwalk.hide(since).map_err(GitError::RevwalkError)?;
    }

    let mut commits = Vec::new();

    for oid_result in revwalk {
        let oid = oid_result.map_err(GitError::RevwalkError)?;
        let commit = repo.find_commit(oid).map_err(GitError::ParseCommit)?;
        commits.push(CommitRecord::from_git2_commit(&commit));
    }

    debug!(count = commits.len(), "Fetched commits");
    Ok(commits)
}
