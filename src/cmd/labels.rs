//! `corral labels` — list, create, and delete labels across the
//! organization.

use anyhow::Result;

use corral::config::Config;

use crate::LabelsCommands;

pub async fn cmd_labels(config: &Config, command: &LabelsCommands) -> Result<()> {
    let org = super::aggregator(config)?;
    match command {
        LabelsCommands::List => {
            let grouped = org.list_labels().await?;
            for (name, entries) in grouped.iter() {
                let repos: Vec<&str> = entries.iter().map(|e| e.repo.as_str()).collect();
                println!(
                    "{:<28} #{:<8} in {} repos: {}",
                    name,
                    entries[0].label.color,
                    entries.len(),
                    repos.join(", ")
                );
            }
            println!();
            println!("{} distinct label names in {}", grouped.len(), org.org());
        }
        LabelsCommands::Create { name, color } => {
            let report = org.create_label(name, color).await?;
            super::print_report(&format!("create label {name}"), &report);
        }
        LabelsCommands::Delete { name } => {
            let report = org.delete_label(name).await?;
            super::print_report(&format!("delete label {name}"), &report);
        }
    }
    Ok(())
}
