//! `corral issues` — list and export issues across the organization.

use std::path::Path;

use anyhow::{Context, Result};

use corral::config::Config;
use corral::github::models::IssueFilter;
use corral::github::org::issues_by_milestone;

pub async fn cmd_issues_list(
    config: &Config,
    filter: &IssueFilter,
    by_milestone: bool,
) -> Result<()> {
    let org = super::aggregator(config)?;
    let issues = org.list_issues(filter).await?;

    if by_milestone {
        let grouped = issues_by_milestone(issues);
        for (milestone, group) in grouped.iter() {
            println!("{milestone} ({} issues)", group.len());
            for issue in group {
                println!("  #{:<6} [{}] {}", issue.number, issue.state, issue.title);
            }
            println!();
        }
        return Ok(());
    }

    for issue in &issues {
        println!(
            "#{:<6} [{}] {:<50} {}",
            issue.number,
            issue.state,
            issue.title,
            issue
                .assignee
                .as_ref()
                .map(|a| a.login.as_str())
                .unwrap_or("-"),
        );
    }
    println!();
    println!("{} issues in {}", issues.len(), org.org());
    Ok(())
}

pub async fn cmd_issues_export(
    config: &Config,
    filter: &IssueFilter,
    output: Option<&Path>,
) -> Result<()> {
    let org = super::aggregator(config)?;
    let issues = org.list_issues(filter).await?;
    let rendered = serde_json::to_string_pretty(&issues).context("Failed to serialize issues")?;

    match output {
        Some(path) => {
            std::fs::write(path, format!("{rendered}\n"))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Exported {} issues to {}", issues.len(), path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
