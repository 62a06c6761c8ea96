//! CLI command implementations.
//!
//! Each submodule owns one `Commands` variant family:
//!
//! | Module       | Commands handled                       |
//! |--------------|----------------------------------------|
//! | `repos`      | `Repos`                                |
//! | `issues`     | `Issues` (list, export)                |
//! | `labels`     | `Labels` (list, create, delete)        |
//! | `milestones` | `Milestones` (list, create, delete)    |
//! | `events`     | `Events`                               |
//! | `sync`       | `Sync`                                 |
//! | `release`    | `Release`                              |
//! | `config`     | `Config`                               |

use anyhow::Result;
use console::style;

use corral::config::Config;
use corral::github::client::GithubClient;
use corral::github::fanout::Settled;
use corral::github::org::{FanOutReport, OrgAggregator};

pub mod config;
pub mod events;
pub mod issues;
pub mod labels;
pub mod milestones;
pub mod release;
pub mod repos;
pub mod sync;

pub use config::cmd_config_show;
pub use events::cmd_events;
pub use issues::{cmd_issues_export, cmd_issues_list};
pub use labels::cmd_labels;
pub use milestones::cmd_milestones;
pub use release::cmd_release;
pub use repos::cmd_repos;
pub use sync::cmd_sync;

/// Build a bare API client from configuration. Only the token is required;
/// commands that operate on user-scoped endpoints work without an
/// organization.
pub(crate) fn client(config: &Config) -> Result<GithubClient> {
    let token = config.require_token()?;
    Ok(GithubClient::with_base_url(token, &config.api_url)?)
}

/// Build the org aggregator from configuration, failing early with guidance
/// when the token or organization is missing.
pub(crate) fn aggregator(config: &Config) -> Result<OrgAggregator> {
    let org = config.require_org()?;
    Ok(OrgAggregator::new(client(config)?, org))
}

/// Print one OK/FAILED line per repository, in repository-list order, plus a
/// summary.
pub(crate) fn print_report<T>(action: &str, report: &FanOutReport<T>) {
    for (name, outcome) in report.iter() {
        match outcome {
            Settled::Fulfilled(_) => {
                println!("{:<32} {}", name, style("OK").green());
            }
            Settled::Rejected(detail) => {
                println!(
                    "{:<32} {} {}",
                    name,
                    style("FAILED").red(),
                    detail.message
                );
            }
        }
    }
    let failed = report.rejected_count();
    println!();
    println!(
        "{action}: {} ok, {} failed of {} repositories",
        report.len() - failed,
        failed,
        report.len()
    );
}
