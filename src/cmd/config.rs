//! `corral config show` — display the effective configuration.

use anyhow::Result;

use corral::config::Config;

pub fn cmd_config_show(config: &Config) -> Result<()> {
    println!("workspace dir: {}", config.workspace_dir.display());
    println!("organization:  {}", config.org.as_deref().unwrap_or("(unset)"));
    println!(
        "token:         {}",
        if config.token.is_some() { "(set)" } else { "(unset)" }
    );
    println!("api url:       {}", config.api_url);
    println!("verbose:       {}", config.verbose);
    Ok(())
}
