//! `corral milestones` — list, create, and delete milestones across the
//! organization.

use anyhow::Result;

use corral::config::Config;

use crate::MilestonesCommands;

pub async fn cmd_milestones(config: &Config, command: &MilestonesCommands) -> Result<()> {
    let org = super::aggregator(config)?;
    match command {
        MilestonesCommands::List => {
            let grouped = org.list_milestones().await?;
            for (title, entries) in grouped.iter() {
                let open: i64 = entries.iter().map(|e| e.milestone.open_issues).sum();
                let closed: i64 = entries.iter().map(|e| e.milestone.closed_issues).sum();
                println!(
                    "{:<28} in {} repos ({open} open / {closed} closed issues)",
                    title,
                    entries.len(),
                );
            }
            println!();
            println!("{} distinct milestone titles in {}", grouped.len(), org.org());
        }
        MilestonesCommands::Create { title } => {
            let report = org.create_milestone(title).await?;
            super::print_report(&format!("create milestone {title}"), &report);
        }
        MilestonesCommands::Delete { title } => {
            let report = org.delete_milestone(title).await?;
            super::print_report(&format!("delete milestone {title}"), &report);
        }
    }
    Ok(())
}
