//! `corral events` — a user's public activity feed.

use anyhow::Result;

use corral::config::Config;
use corral::github::org::user_events;

pub async fn cmd_events(config: &Config, user: &str) -> Result<()> {
    // User feeds are not org-scoped; only the token is needed.
    let client = super::client(config)?;
    let events = user_events(&client, user).await?;

    for event in &events {
        println!(
            "{}  {:<24} {}",
            event.created_at.format("%Y-%m-%d %H:%M"),
            event.kind,
            event.repo.name,
        );
    }
    println!();
    println!("{} events for {user}", events.len());
    Ok(())
}
