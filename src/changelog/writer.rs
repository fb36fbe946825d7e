//! Write new changelog sections.

use std::io::Write;
use std::path::Path;

use semver::Version;
use tracing::debug;

use crate::error::ChangelogError;

use super::format::{format_version_section, CHANGELOG_HEADER};
use super::parser::{
    find_insertion_point, first_version_link, has_version_heading, unreleased_link_base,
    UNRELEASED_LINK,
};

/// A released version to record in the changelog.
#[derive(Debug, Clone)]
pub struct ChangelogUpdate {
    pub version: Version,
    /// Body of the section, e.g. `### Added\n- ...`.
    pub entry: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// Used for comparison links when the changelog has none to copy from.
    pub repo_url: Option<String>,
}

/// Write a new version section to the changelog at `path`.
///
/// - Creates the file with header if it doesn't exist
/// - Backs up an existing file to `<filename>.md.bak` (e.g., `CHANGELOG.md.bak`)
/// - Rewrites the `[Unreleased]` comparison link and adds one for the new version
/// - Replaces the file atomically
pub fn update_changelog(path: &Path, update: &ChangelogUpdate) -> Result<(), ChangelogError> {
    let existing = match std::fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(ChangelogError::ReadFailed(e)),
    };

    let base = existing.as_deref().unwrap_or(CHANGELOG_HEADER);
    let new_content = apply_update(base, update)?;

    if existing.is_some() {
        let backup_path = path.with_extension("md.bak");
        std::fs::copy(path, &backup_path).map_err(ChangelogError::BackupFailed)?;
        debug!(backup = %backup_path.display(), "Backed up changelog");
    }

    write_atomic(path, &new_content)
}

/// Apply `update` to changelog text.
pub fn apply_update(content: &str, update: &ChangelogUpdate) -> Result<String, ChangelogError> {
    if has_version_heading(content, &update.version) {
        return Err(ChangelogError::VersionAlreadyExists(format!(
            "v{}",
            update.version
        )));
    }

    let section = format_version_section(&update.version, &update.date, &update.entry);
    let insertion_point = find_insertion_point(content);

    let mut new_content = String::with_capacity(content.len() + section.len());
    new_content.push_str(&content[..insertion_point]);
    new_content.push_str(&section);
    new_content.push_str(&content[insertion_point..]);

    Ok(update_links(new_content, update))
}

fn update_links(content: String, update: &ChangelogUpdate) -> String {
    if !content.contains("[Unreleased]:") {
        return content;
    }

    let Some(base) = unreleased_link_base(&content)
        .or_else(|| update.repo_url.clone())
        .map(|url| url.trim_end_matches('/').to_string())
    else {
        debug!("No repository URL for changelog links");
        return content;
    };

    let version = &update.version;
    let previous = first_version_link(&content);

    let content = UNRELEASED_LINK
        .replace(&content, |_: &regex_lite::Captures| {
            format!("[Unreleased]: {}/compare/v{}...HEAD", base, version)
        })
        .into_owned();

    let new_link = match previous {
        Some(prev) => format!("[v{}]: {}/compare/v{}...v{}", version, base, prev, version),
        None => format!("[v{}]: {}/releases/tag/v{}", version, base, version),
    };

    format!("{}\n{}\n", content.trim_end(), new_link)
}

fn write_atomic(path: &Path, content: &str) -> Result<(), ChangelogError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(ChangelogError::WriteFailed)?;
    file.write_all(content.as_bytes())
        .map_err(ChangelogError::WriteFailed)?;
    file.persist(path)
        .map_err(|e| ChangelogError::WriteFailed(e.error))?;

    Ok(())
}
