//! `corral sync` — bring every workspace checkout up to date with its
//! upstream.

use anyhow::Result;
use console::style;
use tracing::warn;

use corral::config::Config;
use corral::manifest::Manifest;
use corral::vcs::VcsRunner;

pub async fn cmd_sync(config: &Config) -> Result<()> {
    let manifest = Manifest::load(&config.workspace_dir)?;
    let vcs = VcsRunner::new();

    let mut failed = 0;
    for entry in &manifest.entries {
        let dir = config.workspace_dir.join(&entry.dir);
        let result = if dir.exists() {
            // Existing checkout: fetch and fast-forward to upstream.
            match vcs.fetch(&dir).await {
                Ok(()) => vcs.reset_hard(&dir, "@{upstream}").await,
                Err(err) => Err(err),
            }
        } else {
            vcs.clone_repo(&config.workspace_dir, &entry.url, &entry.dir)
                .await
        };

        match result {
            Ok(()) => println!("{:<32} {}", entry.dir, style("OK").green()),
            Err(err) => {
                failed += 1;
                warn!(dir = %entry.dir, error = %err, "sync failed");
                println!("{:<32} {} {err}", entry.dir, style("FAILED").red());
            }
        }
    }

    println!();
    println!(
        "sync: {} ok, {failed} failed of {} checkouts",
        manifest.len() - failed,
        manifest.len()
    );
    Ok(())
}
