//! Remote URL helpers.

use git2::Repository;

use crate::error::GitError;

/// URL of the `origin` remote, or `None` without one.
pub fn origin_url(repo: &Repository) -> Result<Option<String>, GitError> {
    let remote = match repo.find_remote("origin") {
        Ok(remote) => remote,
        Err(e) if e.code() == git2::ErrorCode::NotFound => return Ok(None),
        Err(e) => return Err(GitError::RemoteNotFound("origin".to_string(), e)),
    };
    Ok(remote.url().map(str::to_string))
}

/// Convert a GitHub remote URL into its web URL.
///
/// Handles `git@github.com:owner/repo.git` and
/// `https://github.com/owner/repo(.git)`. Returns `None` for other hosts.
pub fn github_web_url(url: &str) -> Option<String> {
    let path = if let Some(path) = url.strip_prefix("git@github.com:") {
        path
    } else {
        url.split("github.com/").nth(1)?
    };

    let path = path.trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    let mut parts = path.split('/');
    let owner = parts.next().filter(|p| !p.is_empty())?;
    let repo = parts.next().filter(|p| !p.is_empty())?;

    Some(format!("https://github.com/{}/{}", owner, repo))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ssh_url() {
        assert_eq!(
            github_web_url("git@github.com:oatakan/ansible-role.git").as_deref(),
            Some("https://github.com/oatakan/ansible-role")
        );
    }

    #[test]
    fn test_https_url() {
        assert_eq!(
            github_web_url("https://github.com/owner/repo.git").as_deref(),
            Some("https://github.com/owner/repo")
        );
        assert_eq!(
            github_web_url("https://github.com/owner/repo").as_deref(),
            Some("https://github.com/owner/repo")
        );
    }

    #[test]
    fn test_non_github_url() {
        assert_eq!(github_web_url("https://gitlab.com/owner/repo.git"), None);
        assert_eq!(github_web_url("https://github.com/owner"), None);
    }

    #[test]
    fn test_origin_url_missing_remote() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let repo = Repository::init(dir.path()).expect("failed to init repo");
        assert_eq!(origin_url(&repo).expect("missing origin is not an error"), None);
    }

    #[test]
    fn test_origin_url_present() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let repo = Repository::init(dir.path()).expect("failed to init repo");
        repo.remote("origin", "git@github.com:owner/repo.git")
            .expect("failed to add remote");

        let url = origin_url(&repo).expect("failed to read origin");
        assert_eq!(url.as_deref(), Some("git@github.com:owner/repo.git"));
    }
}
