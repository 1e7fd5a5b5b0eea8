//! Sprinter CLI - Command line interface for Sprinter
//!
//! Query and update the issue trackers of several GitHub repositories at once.

mod commands;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sprinter_core::config::parse_duration;
use sprinter_core::repo::repo_list_from_arg;
use sprinter_core::{Config, Secrets, Sprinter};
use sprinter_github::GitHubClient;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{
    CloseMilestonesArgs, CreateLabelsArgs, CreateMilestonesArgs, IssuesArgs, PrsArgs,
    UpdateMilestonesArgs,
};

/// Sprinter: one view over the issue trackers of many repositories
#[derive(Parser, Debug)]
#[command(name = "sprinter")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Repositories to operate on: comma separated `owner/name` slugs, or a
    /// file with one slug per line (overrides config and env)
    #[arg(long, global = true)]
    repos: Option<String>,

    /// Cache read results for this long, e.g. `30s` or `5m` (overrides
    /// config and env)
    #[arg(long, global = true, value_parser = parse_cache_duration)]
    cache: Option<Duration>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// List the monitored repositories
    Repos,

    /// List issues, grouped by milestone and repository
    #[command(visible_alias = "i")]
    Issues(IssuesArgs),

    /// List pull requests, grouped by repository
    Prs(PrsArgs),

    /// List milestones, grouped by title
    #[command(visible_alias = "m")]
    Milestones,

    /// Create the same milestone in every repository
    CreateMilestones(CreateMilestonesArgs),

    /// Rename or reschedule a milestone in every repository that has it
    UpdateMilestones(UpdateMilestonesArgs),

    /// Close a milestone in every repository that has it
    CloseMilestones(CloseMilestonesArgs),

    /// List labels, grouped by repository
    Labels,

    /// Create labels in every repository
    CreateLabels(CreateLabelsArgs),

    /// List collaborators across all repositories
    Collaborators,

    /// Show current configuration
    Config,
}

fn parse_cache_duration(value: &str) -> Result<Duration, String> {
    parse_duration(value).map_err(|e| e.to_string())
}

/// Build the sprinter for the configured repositories and credentials
fn connect(config: &Config) -> anyhow::Result<Sprinter> {
    let credentials = Secrets::load()?.require_credentials()?;
    let client = GitHubClient::new(&credentials, config.github.api_url.as_deref())?;
    let sprinter = Sprinter::new(Arc::new(client), &config.repos, config.cache.duration)
        .context("Cannot operate on the configured repositories")?;
    Ok(sprinter)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let repos = cli.repos.as_deref().map(repo_list_from_arg).transpose()?;
    let config = Config::load_with_overrides(repos, cli.cache)?;

    if cli.verbose {
        tracing::info!(
            repos = config.repos.len(),
            cache = ?config.cache.duration,
            "Configuration loaded"
        );
    }

    match cli.command {
        Some(Commands::Version) => {
            println!("sprinter {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Repos) => {
            let repos = sprinter_core::repo::resolve(&config.repos)?;
            println!("Monitored repositories ({}):", repos.len());
            for repo in repos {
                println!("  {}", repo);
            }
        }
        Some(Commands::Issues(args)) => {
            args.execute(&connect(&config)?).await?;
        }
        Some(Commands::Prs(args)) => {
            args.execute(&connect(&config)?).await?;
        }
        Some(Commands::Milestones) => {
            commands::milestones::list(&connect(&config)?).await;
        }
        Some(Commands::CreateMilestones(args)) => {
            args.execute(&connect(&config)?).await;
        }
        Some(Commands::UpdateMilestones(args)) => {
            args.execute(&connect(&config)?).await;
        }
        Some(Commands::CloseMilestones(args)) => {
            args.execute(&connect(&config)?).await;
        }
        Some(Commands::Labels) => {
            commands::labels::list(&connect(&config)?).await;
        }
        Some(Commands::CreateLabels(args)) => {
            args.execute(&connect(&config)?).await;
        }
        Some(Commands::Collaborators) => {
            commands::labels::collaborators(&connect(&config)?).await;
        }
        Some(Commands::Config) => {
            println!("Sprinter Configuration");
            println!("======================");
            println!();
            println!("Repositories:");
            if config.repos.is_empty() {
                println!("  (none)");
            }
            for repo in &config.repos {
                println!("  {}", repo);
            }
            println!();
            if config.cache.duration.is_zero() {
                println!("Cache: disabled");
            } else {
                println!(
                    "Cache: {}",
                    humantime_serde::re::humantime::format_duration(config.cache.duration)
                );
            }
            println!(
                "GitHub API: {}",
                config
                    .github
                    .api_url
                    .as_deref()
                    .unwrap_or("https://api.github.com")
            );
            println!();
            if let Some(path) = Config::default_config_path() {
                println!("Config file: {}", path.display());
                if path.exists() {
                    println!("  (exists)");
                } else {
                    println!("  (not found - using defaults)");
                }
            }
            if let Some(path) = Secrets::default_secrets_path() {
                println!("Secrets file: {}", path.display());
                if !path.exists() {
                    println!("  (not found - set GITHUB_TOKEN or GH_USERNAME/GH_PASSWORD)");
                }
            }
        }
        None => {
            println!("Sprinter - one view over the issue trackers of many repositories");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::parse_from([
            "sprinter",
            "--repos",
            "org/a,org/b",
            "--cache",
            "5m",
            "issues",
            "--state",
            "all",
        ]);
        assert_eq!(cli.repos.as_deref(), Some("org/a,org/b"));
        assert_eq!(cli.cache, Some(Duration::from_secs(300)));
        assert!(matches!(cli.command, Some(Commands::Issues(_))));
    }

    #[test]
    fn test_bad_cache_duration_rejected() {
        let result = Cli::try_parse_from(["sprinter", "--cache", "later", "labels"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_create_labels_args() {
        let cli = Cli::parse_from(["sprinter", "create-labels", "bug:fc2929", "super:000000"]);
        match cli.command {
            Some(Commands::CreateLabels(args)) => assert_eq!(args.labels.len(), 2),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
