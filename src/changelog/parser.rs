//! Locating sections and comparison links in an existing changelog.

use std::sync::LazyLock;

use regex_lite::Regex;
use semver::Version;

/// `[Unreleased]: <base>/compare/<from>...HEAD`
pub(crate) static UNRELEASED_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[Unreleased\]: (.+)/compare/(.+?)\.\.\.HEAD").expect("valid regex")
});

/// `[vX.Y.Z]:` link reference definitions.
static VERSION_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[v([\d.]+)\]:").expect("valid regex"));

fn is_unreleased_heading(line: &str) -> bool {
    line.trim_start()
        .to_lowercase()
        .starts_with("## [unreleased]")
}

fn is_link_definition(line: &str) -> bool {
    line.starts_with('[') && line.contains("]: ")
}

/// Byte offset where a new version section goes.
///
/// That is the end of the `## [Unreleased]` section: just before the next
/// `## [` heading or the first link reference definition after it, or the
/// end of the content. Without an Unreleased section the content end is
/// returned.
pub fn find_insertion_point(content: &str) -> usize {
    let mut offset: usize = 0;
    let mut in_unreleased = false;

    for line in content.split_inclusive('\n') {
        let bare = line.trim_end_matches(['\n', '\r']);

        if in_unreleased && (bare.starts_with("## [") || is_link_definition(bare)) {
            // Insert before the newline that ends the previous line.
            return offset.saturating_sub(1);
        }
        if !in_unreleased && is_unreleased_heading(bare) {
            in_unreleased = true;
        }

        offset += line.len();
    }

    content.len()
}

/// Whether a section for `version` already exists (`## [vX.Y.Z]` or `## [X.Y.Z]`).
pub fn has_version_heading(content: &str, version: &Version) -> bool {
    let with_v = format!("## [v{}]", version);
    let without_v = format!("## [{}]", version);
    content
        .lines()
        .map(str::trim_start)
        .any(|line| line.starts_with(&with_v) || line.starts_with(&without_v))
}

/// Version of the first `[vX.Y.Z]:` link definition.
pub fn first_version_link(content: &str) -> Option<String> {
    VERSION_LINK
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Repository base URL from the `[Unreleased]` comparison link.
pub fn unreleased_link_base(content: &str) -> Option<String> {
    UNRELEASED_LINK
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
