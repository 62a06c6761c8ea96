//! `corral release` — cut a release branch across every workspace checkout
//! and pin cross-repo dependency references to it.

use anyhow::Result;
use console::style;
use tracing::warn;

use corral::config::Config;
use corral::manifest::Manifest;
use corral::release::{RewriteOutcome, cut_release_branch};
use corral::vcs::VcsRunner;

pub async fn cmd_release(config: &Config, branch: &str) -> Result<()> {
    let manifest = Manifest::load(&config.workspace_dir)?;
    let vcs = VcsRunner::new();

    let mut failed = 0;
    for entry in &manifest.entries {
        let dir = config.workspace_dir.join(&entry.dir);
        if !dir.exists() {
            failed += 1;
            println!(
                "{:<32} {} checkout missing, run `corral sync` first",
                entry.dir,
                style("FAILED").red()
            );
            continue;
        }

        match cut_release_branch(&vcs, &dir, branch).await {
            Ok(outcomes) => {
                let pinned = outcomes.iter().filter(|o| o.is_pinned()).count();
                println!(
                    "{:<32} {} ({pinned} dependencies pinned)",
                    entry.dir,
                    style("OK").green()
                );
                for outcome in &outcomes {
                    if let RewriteOutcome::AlreadyPinned { dependency, existing } = outcome {
                        println!(
                            "  {} {dependency} already pins #{existing}, left untouched",
                            style("warning:").yellow()
                        );
                    }
                }
            }
            Err(err) => {
                failed += 1;
                warn!(dir = %entry.dir, error = %err, "release branching failed");
                println!("{:<32} {} {err:#}", entry.dir, style("FAILED").red());
            }
        }
    }

    println!();
    println!(
        "release {branch}: {} ok, {failed} failed of {} checkouts",
        manifest.len() - failed,
        manifest.len()
    );
    Ok(())
}
