//! role-release - CLI entry point.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use git2::Repository;
use semver::Version;
use tracing_subscriber::EnvFilter;

use role_release::config::is_truthy;
use role_release::git::{github_web_url, origin_url};
use role_release::version::bump::parse_version;
use role_release::{
    update_changelog, AiMode, AnalyzerConfig, ChangelogUpdate, OutputSink, Provider,
    ProviderSelection, ReleaseAnalyzer, ReleaseNotesSettings,
};

/// Decide semantic version bumps and write release notes for Ansible roles.
#[derive(Parser, Debug)]
#[command(name = "role-release")]
#[command(about = "Decide semantic version bumps and write release notes for Ansible roles")]
#[command(version)]
struct Cli {
    /// Verbose logging and full provider error details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze commits since the latest release tag and emit CI outputs
    Analyze(AnalyzeArgs),
    /// Insert a released version section into CHANGELOG.md
    UpdateChangelog(UpdateChangelogArgs),
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Path to the git repository
    #[arg(long, default_value = ".")]
    repo: PathBuf,

    /// Release even without new commits (also FORCE_RELEASE=true)
    #[arg(long)]
    force_release: bool,

    /// Skip AI providers and use rule-based analysis only
    #[arg(long)]
    no_llm: bool,

    /// Preferred AI provider; the other one is the fallback
    #[arg(long, value_enum, default_value_t = Provider::Claude)]
    provider: Provider,

    /// Galaxy role name for the install command, e.g. owner.role_name
    #[arg(long)]
    role_name: Option<String>,

    /// Repository web URL (defaults to the GitHub origin remote)
    #[arg(long)]
    repo_url: Option<String>,

    /// Compatibility line for the release notes (repeatable)
    #[arg(long = "compat")]
    compatibility: Vec<String>,

    /// Print outputs instead of writing them to the CI output file
    #[arg(long)]
    dry_run: bool,

    /// CI output file to append to
    #[arg(long, env = "GITHUB_OUTPUT")]
    github_output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct UpdateChangelogArgs {
    /// Released version (a leading `v` is accepted)
    #[arg(long, value_parser = parse_version)]
    version: Version,

    /// Changelog entry text
    #[arg(long, conflicts_with = "entry_file", required_unless_present = "entry_file")]
    entry: Option<String>,

    /// File containing the changelog entry
    #[arg(long)]
    entry_file: Option<PathBuf>,

    /// Path to changelog file
    #[arg(long, default_value = "CHANGELOG.md")]
    changelog: PathBuf,

    /// Repository web URL for comparison links
    #[arg(long)]
    repo_url: Option<String>,

    /// Release date (defaults to today, UTC)
    #[arg(long)]
    date: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_directive = if cli.verbose {
        "role_release=debug"
    } else {
        "role_release=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Analyze(args) => analyze(args, cli.verbose).await,
        Command::UpdateChangelog(args) => update(args),
    }
}

async fn analyze(args: AnalyzeArgs, verbose: bool) -> Result<()> {
    let force_release = args.force_release
        || std::env::var("FORCE_RELEASE").is_ok_and(|v| is_truthy(&v));

    let config = AnalyzerConfig {
        repo_path: args.repo,
        force_release,
        ai: if args.no_llm {
            AiMode::Disabled
        } else {
            AiMode::Auto(ProviderSelection::from_primary(args.provider))
        },
        notes: ReleaseNotesSettings {
            role_name: args.role_name,
            repo_url: args.repo_url,
            compatibility: args.compatibility,
        },
    };

    let mut analyzer = ReleaseAnalyzer::new(config).verbose(verbose);
    if analyzer.uses_ai() {
        println!("Analyzing release with AI...");
    } else {
        println!("Analyzing release with rule-based analysis...");
    }

    let report = analyzer
        .run()
        .await
        .context("Release analysis failed")?;

    match &report.plan {
        None => println!("No commits since last release"),
        Some(plan) => {
            let from = report
                .latest_tag
                .as_ref()
                .map(|t| t.name.clone())
                .unwrap_or_else(|| "none".to_string());
            println!("Found {} commits since {}", report.commit_count, from);
            println!(
                "Version: {} -> v{} ({}, via {})",
                from, plan.new_version, plan.decision.version_bump, plan.source
            );
            if !plan.decision.should_release {
                println!("No release needed");
            }
        }
    }

    let sink = if args.dry_run {
        OutputSink::Stdout
    } else {
        OutputSink::from_path(args.github_output)
    };
    if sink == OutputSink::Stdout {
        println!("\n--- Outputs ---\n");
    }
    sink.write_all(&report.outputs())
        .context("Failed to write CI outputs")?;

    Ok(())
}

fn update(args: UpdateChangelogArgs) -> Result<()> {
    let entry = match (args.entry, args.entry_file) {
        (Some(entry), _) => entry,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read entry file {}", path.display()))?,
        (None, None) => anyhow::bail!("Either --entry or --entry-file is required"),
    };

    let repo_url = args.repo_url.or_else(detect_repo_url);
    let date = args
        .date
        .unwrap_or_else(|| Utc::now().format("%Y-%m-%d").to_string());

    let update = ChangelogUpdate {
        version: args.version,
        entry,
        date,
        repo_url,
    };

    update_changelog(&args.changelog, &update).context("Failed to update changelog")?;
    println!(
        "✓ Added v{} to {}",
        update.version,
        args.changelog.display()
    );

    Ok(())
}

/// GitHub web URL of the current repository's origin, if any.
fn detect_repo_url() -> Option<String> {
    let repo = Repository::discover(".").ok()?;
    let url = origin_url(&repo).ok()??;
    github_web_url(&url)
}
