//! Changelog parsing and writing.

pub mod format;
pub mod parser;
pub mod writer;

pub use format::{format_version_section, CHANGELOG_HEADER};
pub use writer::{update_changelog, ChangelogUpdate};
