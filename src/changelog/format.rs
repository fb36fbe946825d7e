//! Keep a Changelog formatting.

use semver::Version;

/// Header for a changelog created from scratch.
pub const CHANGELOG_HEADER: &str = r#"# Changelog

All notable changes to this project will be documented in this file.

The format is based on [Keep a Changelog](https://keepachangelog.com/en/1.0.0/),
and this project adheres to [Semantic Versioning](https://semver.org/spec/v2.0.0.html).

## [Unreleased]
"#;

/// Heading for a released version, e.g. `## [v1.2.0] - 2024-05-01`.
pub fn version_heading(version: &Version, date: &str) -> String {
    format!("## [v{}] - {}", version, date)
}

/// A version section, starting with a blank line and ending with a newline.
pub fn format_version_section(version: &Version, date: &str, entry: &str) -> String {
    format!("\n{}\n\n{}\n", version_heading(version, date), entry.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_version_section() {
        let section = format_version_section(
            &Version::new(1, 2, 0),
            "2024-01-01",
            "### Added\n- Rocky 9 support\n",
        );
        assert_eq!(
            section,
            "\n## [v1.2.0] - 2024-01-01\n\n### Added\n- Rocky 9 support\n"
        );
    }

    #[test]
    fn test_header_ends_with_unreleased() {
        assert!(CHANGELOG_HEADER.trim_end().ends_with("## [Unreleased]"));
    }
}
