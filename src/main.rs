use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use corral::config::Config;
use corral::github::models::IssueFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "corral")]
#[command(version, about = "Coordinate a herd of GitHub repositories")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Organization to operate on (falls back to CORRAL_ORG / corral.toml)
    #[arg(long, global = true)]
    pub org: Option<String>,

    /// API token (falls back to GITHUB_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Workspace directory holding workspace.json and the checkouts
    #[arg(long, global = true)]
    pub workspace_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the organization's repositories
    Repos,
    /// List or export issues across the organization
    Issues {
        #[command(subcommand)]
        command: IssuesCommands,
    },
    /// Manage labels across every repository
    Labels {
        #[command(subcommand)]
        command: LabelsCommands,
    },
    /// Manage milestones across every repository
    Milestones {
        #[command(subcommand)]
        command: MilestonesCommands,
    },
    /// Show a user's public activity feed
    Events { user: String },
    /// Clone or update every workspace checkout
    Sync,
    /// Cut a release branch across the workspace and pin dependencies to it
    Release { branch: String },
    /// Show the effective configuration
    Config,
}

#[derive(Subcommand, Clone)]
pub enum IssuesCommands {
    /// List issues, optionally grouped by milestone
    List {
        #[arg(long)]
        state: Option<String>,

        /// Comma-separated label names
        #[arg(long)]
        label: Option<String>,

        #[arg(long)]
        milestone: Option<String>,

        #[arg(long)]
        assignee: Option<String>,

        /// Group output by milestone title
        #[arg(long)]
        by_milestone: bool,
    },
    /// Export issues as JSON
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long)]
        state: Option<String>,
    },
}

#[derive(Subcommand, Clone)]
pub enum LabelsCommands {
    /// Group every repository's labels by name
    List,
    /// Create a label in every repository
    Create { name: String, color: String },
    /// Delete a label from every repository
    Delete { name: String },
}

#[derive(Subcommand, Clone)]
pub enum MilestonesCommands {
    /// Group every repository's milestones by title
    List,
    /// Create a milestone in every repository
    Create { title: String },
    /// Delete a milestone by title from every repository
    Delete { title: String },
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "corral=debug" } else { "corral=warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(
        cli.workspace_dir.clone(),
        cli.org.clone(),
        cli.token.clone(),
        cli.verbose,
    )?;

    match &cli.command {
        Commands::Repos => cmd::cmd_repos(&config).await?,
        Commands::Issues { command } => match command {
            IssuesCommands::List {
                state,
                label,
                milestone,
                assignee,
                by_milestone,
            } => {
                let filter = IssueFilter {
                    state: state.clone(),
                    labels: label.clone(),
                    milestone: milestone.clone(),
                    assignee: assignee.clone(),
                };
                cmd::cmd_issues_list(&config, &filter, *by_milestone).await?;
            }
            IssuesCommands::Export { output, state } => {
                let filter = IssueFilter {
                    state: state.clone(),
                    ..IssueFilter::default()
                };
                cmd::cmd_issues_export(&config, &filter, output.as_deref()).await?;
            }
        },
        Commands::Labels { command } => cmd::cmd_labels(&config, command).await?,
        Commands::Milestones { command } => cmd::cmd_milestones(&config, command).await?,
        Commands::Events { user } => cmd::cmd_events(&config, user).await?,
        Commands::Sync => cmd::cmd_sync(&config).await?,
        Commands::Release { branch } => cmd::cmd_release(&config, branch).await?,
        Commands::Config => cmd::cmd_config_show(&config)?,
    }

    Ok(())
}
