//! `corral repos` — list the organization's repositories.

use anyhow::Result;

use corral::config::Config;

pub async fn cmd_repos(config: &Config) -> Result<()> {
    let org = super::aggregator(config)?;
    let repos = org.list_repositories().await?;

    println!("{:<32} {:>10} {:<10} Default branch", "Repository", "Id", "Private");
    for repo in &repos {
        println!(
            "{:<32} {:>10} {:<10} {}",
            repo.name,
            repo.id,
            if repo.private { "private" } else { "public" },
            repo.default_branch.as_deref().unwrap_or("-"),
        );
    }
    println!();
    println!("{} repositories in {}", repos.len(), org.org());
    Ok(())
}
