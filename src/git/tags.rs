//! Release tag enumeration and version detection.

use std::collections::HashMap;

use git2::Repository;
use semver::Version;
use tracing::{debug, warn};

use crate::error::GitError;

/// A git tag with optional semver version.
#[derive(Debug, Clone)]
pub struct TagInfo {
    pub name: String,
    pub oid: git2::Oid,
    pub version: Option<Version>,
}

/// Whether `name` is a release tag: `vX.Y.Z` or `X.Y.Z` with plain digits.
///
/// Pre-release and build suffixes (`v1.0.0-rc.1`) are not release tags.
pub fn is_release_tag(name: &str) -> bool {
    let raw = name.strip_prefix('v').unwrap_or(name);
    let mut parts = raw.split('.');
    let major = parts.next();
    let minor = parts.next();
    let patch = parts.next();
    let extra = parts.next();

    extra.is_none()
        && major.is_some_and(is_digits)
        && minor.is_some_and(is_digits)
        && patch.is_some_and(is_digits)
}

fn is_digits(part: &str) -> bool {
    !part.is_empty() && part.chars().all(|c| c.is_ascii_digit())
}

/// Get the latest release tag reachable from HEAD.
///
/// Walks commits reachable from `HEAD` newest first and returns the tag on
/// the first commit that carries one. When a commit has several release tags
/// the highest version wins.
pub fn get_latest_release_tag(repo: &Repository) -> Result<Option<TagInfo>, GitError> {
    let head_oid = match repo.head().ok().and_then(|head| head.target()) {
        Some(oid) => oid,
        None => return Ok(None),
    };

    let mut tags_by_commit: HashMap<git2::Oid, Vec<TagInfo>> = HashMap::new();
    for tag in get_all_tags(repo)?
        .into_iter()
        .filter(|tag| tag.version.is_some() && is_release_tag(&tag.name))
    {
        tags_by_commit.entry(tag.oid).or_default().push(tag);
    }

    if tags_by_commit.is_empty() {
        debug!("No release tags found in repository");
        return Ok(None);
    }

    let mut revwalk = repo.revwalk().map_err(GitError::RevwalkError)?;
    revwalk.push(head_oid).map_err(GitError::RevwalkError)?;
    revwalk
        .set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)
        .map_err(GitError::RevwalkError)?;

    for oid in revwalk {
        let oid = oid.map_err(GitError::RevwalkError)?;
        if let Some(candidates) = tags_by_commit.get(&oid) {
            let latest = candidates
                .iter()
                .max_by(|a, b| a.version.cmp(&b.version))
                .cloned();
            if let Some(tag) = latest {
                debug!(tag = %tag.name, "Found latest reachable release tag");
                return Ok(Some(tag));
            }
        }
    }

    Ok(None)
}

/// Get all tags from the repository, resolved to the commits they point at.
pub fn get_all_tags(repo: &Repository) -> Result<Vec<TagInfo>, GitError> {
    let mut tags = Vec::new();

    repo.tag_foreach(|oid, name_bytes| {
        if let Ok(name_str) = std::str::from_utf8(name_bytes) {
            let name = name_str
                .strip_prefix("refs/tags/")
                .unwrap_or(name_str)
                .to_string();

            let version = get_version_from_tag(&name);

            // Annotated tags point at a tag object, not the commit.
            let resolved_oid = match repo.find_tag(oid) {
                Ok(tag_obj) => tag_obj.target_id(),
                Err(_) => oid,
            };

            tags.push(TagInfo {
                name,
                oid: resolved_oid,
                version,
            });
        } else {
            warn!("Skipping tag with OID {} - name is not valid UTF-8", oid);
        }
        true
    })
    .map_err(GitError::RevwalkError)?;

    Ok(tags)
}

/// Extract semver version from a tag name.
/// Handles both "v1.2.3" and "1.2.3" formats.
pub fn get_version_from_tag(tag_name: &str) -> Option<Version> {
    let version_str = tag_name.strip_prefix('v').unwrap_or(tag_name);
    Version::parse(version_str).ok()
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use git2::{Oid, Signature};

    use super::*;

    fn commit(repo: &Repository, repo_dir: &Path, message: &str) -> Oid {
        let file_path = repo_dir.join("README.md");
        std::fs::write(&file_path, message).expect("failed to write test file");

        let mut index = repo.index().expect("failed to open index");
        index
            .add_path(Path::new("README.md"))
            .expect("failed to add file");
        index.write().expect("failed to write index");

        let tree_id = index.write_tree().expect("failed to write tree");
        let tree = repo.find_tree(tree_id).expect("failed to find tree");
        let sig = Signature::now("Test User", "test@example.com").expect("failed to create sig");
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("failed to create commit")
    }

    fn tag(repo: &Repository, name: &str, oid: Oid) {
        let obj = repo.find_object(oid, None).expect("failed to find object");
        repo.tag_lightweight(name, &obj, false)
            .expect("failed to create tag");
    }

    #[test]
    fn test_release_tag_pattern() {
        assert!(is_release_tag("v1.2.3"));
        assert!(is_release_tag("1.2.3"));
        assert!(is_release_tag("v10.0.42"));
        assert!(!is_release_tag("v1.2"));
        assert!(!is_release_tag("v1.2.3.4"));
        assert!(!is_release_tag("v1.2.3-rc.1"));
        assert!(!is_release_tag("vv1.2.3"));
        assert!(!is_release_tag("release-1.2.3"));
        assert!(!is_release_tag("v1..3"));
    }

    #[test]
    fn test_version_from_tag_with_v() {
        let v = get_version_from_tag("v1.2.3");
        assert_eq!(v, Some(Version::new(1, 2, 3)));
    }

    #[test]
    fn test_version_from_tag_without_v() {
        let v = get_version_from_tag("1.2.3");
        assert_eq!(v, Some(Version::new(1, 2, 3)));
    }

    #[test]
    fn test_version_from_tag_invalid() {
        assert_eq!(get_version_from_tag("nightly"), None);
    }

    #[test]
    fn test_latest_release_tag_ignores_other_tags() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let repo = Repository::init(dir.path()).expect("failed to init repo");

        let first = commit(&repo, dir.path(), "feat: first");
        tag(&repo, "v1.2.3", first);

        let second = commit(&repo, dir.path(), "chore: second");
        tag(&repo, "v1.3.0-rc.1", second);
        tag(&repo, "nightly", second);

        let latest = get_latest_release_tag(&repo)
            .expect("failed to resolve latest tag")
            .expect("expected a release tag");

        assert_eq!(latest.name, "v1.2.3");
        assert_eq!(latest.version, Some(Version::new(1, 2, 3)));
    }

    #[test]
    fn test_latest_release_tag_prefers_closest_to_head() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let repo = Repository::init(dir.path()).expect("failed to init repo");

        let first = commit(&repo, dir.path(), "first");
        tag(&repo, "v1.0.0", first);
        let second = commit(&repo, dir.path(), "second");
        tag(&repo, "v1.1.0", second);
        commit(&repo, dir.path(), "third");

        let latest = get_latest_release_tag(&repo)
            .expect("failed to resolve latest tag")
            .expect("expected a release tag");

        assert_eq!(latest.name, "v1.1.0");
    }

    #[test]
    fn test_latest_release_tag_none_without_tags() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let repo = Repository::init(dir.path()).expect("failed to init repo");
        commit(&repo, dir.path(), "first");

        let latest = get_latest_release_tag(&repo).expect("failed to resolve latest tag");
        assert!(latest.is_none());
    }

    #[test]
    fn test_latest_release_tag_none_for_empty_repo() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let repo = Repository::init(dir.path()).expect("failed to init repo");

        let latest = get_latest_release_tag(&repo).expect("failed to resolve latest tag");
        assert!(latest.is_none());
    }
}
