//! Run configuration and environment lookups.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::llm::ProviderSelection;

/// Read a duration in whole seconds from `var`, falling back to `default_secs`.
///
/// Unset and empty values use the default silently; anything that is not a
/// non-negative integer logs a warning and uses the default.
pub fn duration_from_env(var: &str, default_secs: u64) -> Duration {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => match v.trim().parse::<u64>() {
            Ok(secs) => Duration::from_secs(secs),
            Err(_) => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    var, v, default_secs
                );
                Duration::from_secs(default_secs)
            }
        },
        _ => Duration::from_secs(default_secs),
    }
}

/// Interpret a CI-style boolean flag (`true`, any case).
pub fn is_truthy(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

/// How release analysis should use AI providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiMode {
    /// Rule-based classification only.
    Disabled,
    /// Use providers found on `PATH`, preferring this selection.
    Auto(ProviderSelection),
}

/// Settings for the release-notes template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseNotesSettings {
    /// Galaxy name used in the install command, e.g. `owner.role_name`.
    pub role_name: Option<String>,
    /// Web URL of the repository, without trailing slash.
    pub repo_url: Option<String>,
    /// Compatibility lines, one bullet each.
    pub compatibility: Vec<String>,
}

/// Resolved settings for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub repo_path: PathBuf,
    pub force_release: bool,
    pub ai: AiMode,
    pub notes: ReleaseNotesSettings,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            repo_path: PathBuf::from("."),
            force_release: false,
            ai: AiMode::Auto(ProviderSelection::default()),
            notes: ReleaseNotesSettings::default(),
        }
    }
}
