//! Semver bump types and application.

use std::fmt;

use semver::Version;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::error::VersionError;
use crate::git::TagInfo;

/// Type of version bump.
///
/// Ordered so that `Patch < Minor < Major`; escalation is `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpType {
    Patch,
    Minor,
    Major,
}

impl BumpType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BumpType::Patch => "patch",
            BumpType::Minor => "minor",
            BumpType::Major => "major",
        }
    }
}

impl fmt::Display for BumpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BumpType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "patch" => Ok(BumpType::Patch),
            "minor" => Ok(BumpType::Minor),
            "major" => Ok(BumpType::Major),
            _ => Err(format!("Unknown bump type: {}", s)),
        }
    }
}

/// Case-insensitive so that `"MINOR"` from an AI provider is accepted.
impl<'de> Deserialize<'de> for BumpType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<BumpType>()
            .map_err(|_| de::Error::unknown_variant(&s, &["major", "minor", "patch"]))
    }
}

/// Apply a bump to a base version. No base means `0.0.0`.
///
/// Pre-release and build metadata are dropped.
pub fn apply_bump_to_version(base: Option<&Version>, bump: BumpType) -> Version {
    let base = base.cloned().unwrap_or_else(|| Version::new(0, 0, 0));

    match bump {
        BumpType::Major => Version::new(base.major + 1, 0, 0),
        BumpType::Minor => Version::new(base.major, base.minor + 1, 0),
        BumpType::Patch => Version::new(base.major, base.minor, base.patch + 1),
    }
}

/// Base version for the next release: the tag's version, or `0.0.0`.
pub fn base_version_from_tag(tag: Option<&TagInfo>) -> Version {
    tag.and_then(|t| t.version.clone())
        .unwrap_or_else(|| Version::new(0, 0, 0))
}

/// Parse a user-supplied version, tolerating a leading `v`.
pub fn parse_version(input: &str) -> Result<Version, VersionError> {
    let trimmed = input.trim();
    let raw = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(raw).map_err(|e| VersionError::ParseFailed(input.to_string(), e))
}
