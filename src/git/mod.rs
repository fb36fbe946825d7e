//! Git operations using git2-rs.

pub mod changes;
pub mod commits;
pub mod remote;
pub mod tags;

pub use changes::{categorize_path, collect_changed_files, ChangedFileSet, FileCategory};
pub use commits::{fetch_commits_since, CommitRecord};
pub use remote::{github_web_url, origin_url};
pub use tags::{get_latest_release_tag, get_version_from_tag, is_release_tag, TagInfo};
