//! Release notes: AI-written when a provider is available, template otherwise.

use tracing::{debug, warn};

use crate::config::ReleaseNotesSettings;
use crate::llm::{sanitize_for_prompt, truncate_utf8, LlmRouter};
use crate::version::BumpDecision;

/// Upper bound on the analysis JSON embedded in the prompt.
const MAX_PROMPT_ANALYSIS_BYTES: usize = 8000;

/// Render the fixed release-notes template.
///
/// Sections without data (install command, compatibility, changelog link)
/// are left out.
pub fn render_template(
    decision: &BumpDecision,
    version: &str,
    settings: &ReleaseNotesSettings,
) -> String {
    let whats_new = if decision.changelog_entry.trim().is_empty() {
        "Various improvements and bug fixes"
    } else {
        decision.changelog_entry.trim()
    };

    let mut notes = format!("## Release {}\n\n### What's New\n\n{}\n", version, whats_new);

    if let Some(role) = &settings.role_name {
        notes.push_str(&format!(
            "\n### Installation\n\n```bash\nansible-galaxy install {},{}\n```\n",
            role, version
        ));
    }

    if !settings.compatibility.is_empty() {
        notes.push_str("\n### Compatibility\n\n");
        for item in &settings.compatibility {
            notes.push_str(&format!("- {}\n", item));
        }
    }

    if let Some(url) = &settings.repo_url {
        notes.push_str(&format!(
            "\n**Full Changelog**: {}/blob/main/CHANGELOG.md\n",
            url.trim_end_matches('/')
        ));
    }

    notes
}

/// Prompt asking a provider to write release notes for `version`.
pub fn build_release_notes_prompt(
    decision: &BumpDecision,
    version: &str,
    settings: &ReleaseNotesSettings,
) -> String {
    let analysis = serde_json::to_string_pretty(decision).unwrap_or_default();
    let analysis = sanitize_for_prompt(truncate_utf8(&analysis, MAX_PROMPT_ANALYSIS_BYTES));

    let install = match &settings.role_name {
        Some(role) => format!("ansible-galaxy install {},{}", role, version),
        None => "ansible-galaxy install <role>,<version>".to_string(),
    };

    format!(
        r#"Generate engaging release notes for Ansible role version {version}.

Analysis results:
{analysis}

Create release notes that:
1. Start with a brief summary
2. Highlight key changes
3. Include upgrade instructions if breaking changes
4. Add installation command: {install}
5. Thank contributors

Keep it concise but informative. Use emoji sparingly for key sections.
Respond with the markdown release notes only."#,
    )
}

/// Produce release notes, preferring the AI provider and falling back to the
/// template on any failure.
pub async fn generate_release_notes(
    decision: &BumpDecision,
    version: &str,
    settings: &ReleaseNotesSettings,
    llm: Option<&mut LlmRouter>,
) -> String {
    let Some(llm) = llm else {
        return render_template(decision, version, settings);
    };

    let prompt = build_release_notes_prompt(decision, version, settings);
    match llm.generate_raw(&prompt).await {
        Ok(completion) if !completion.output.trim().is_empty() => {
            debug!(provider = %completion.provider, "Release notes generated");
            completion.output.trim().to_string()
        }
        Ok(completion) => {
            warn!(provider = %completion.provider, "Provider returned empty release notes, using template");
            render_template(decision, version, settings)
        }
        Err(e) => {
            warn!("Release notes generation failed: {}. Using template.", e.summary());
            render_template(decision, version, settings)
        }
    }
}
