//! Release decision and its changelog rendering.

use serde::{Deserialize, Serialize};

use super::bump::BumpType;

/// Entries listed per changelog category.
pub const MAX_LISTED_CHANGES: usize = 5;

/// Changelog used when no commit falls into a category.
pub const PLACEHOLDER_CHANGELOG: &str = "### Changed\n- Minor updates and improvements";

/// Outcome of release analysis.
///
/// Field names match the JSON shape requested from AI providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BumpDecision {
    pub should_release: bool,
    pub version_bump: BumpType,
    pub reasoning: String,
    pub breaking_changes: Vec<String>,
    pub new_features: Vec<String>,
    pub bug_fixes: Vec<String>,
    pub changelog_entry: String,
}

/// Render the markdown changelog entry: Breaking, Added, Fixed.
///
/// Each list is cut to [`MAX_LISTED_CHANGES`]. With nothing to list the
/// placeholder "Changed" section is returned.
pub fn render_changelog_entry(breaking: &[String], features: &[String], fixes: &[String]) -> String {
    let sections = [
        ("Breaking Changes", breaking),
        ("Added", features),
        ("Fixed", fixes),
    ];

    let parts: Vec<String> = sections
        .iter()
        .filter(|(_, items)| !items.is_empty())
        .map(|(heading, items)| {
            let lines: Vec<String> = items
                .iter()
                .take(MAX_LISTED_CHANGES)
                .map(|item| format!("- {}", item))
                .collect();
            format!("### {}\n{}", heading, lines.join("\n"))
        })
        .collect();

    if parts.is_empty() {
        PLACEHOLDER_CHANGELOG.to_string()
    } else {
        parts.join("\n\n")
    }
}

/// Keep the first [`MAX_LISTED_CHANGES`] items.
pub(crate) fn truncate_listed(mut items: Vec<String>) -> Vec<String> {
    items.truncate(MAX_LISTED_CHANGES);
    items
}
