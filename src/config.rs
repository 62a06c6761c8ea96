//! Runtime configuration for corral.
//!
//! Everything is an explicit value threaded into the aggregation layer — no
//! global mutable state. Precedence per field: CLI flag, then environment,
//! then `corral.toml` in the workspace directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::github::client::GITHUB_API_URL;

pub const CONFIG_FILE: &str = "corral.toml";

pub const ENV_TOKEN: &str = "GITHUB_TOKEN";
pub const ENV_ORG: &str = "CORRAL_ORG";

#[derive(Debug, Clone)]
pub struct Config {
    pub workspace_dir: PathBuf,
    pub org: Option<String>,
    pub token: Option<String>,
    pub api_url: String,
    pub verbose: bool,
}

/// Optional `corral.toml` file contents.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    org: Option<String>,
    api_url: Option<String>,
}

impl Config {
    pub fn load(
        workspace_dir: Option<PathBuf>,
        org_flag: Option<String>,
        token_flag: Option<String>,
        verbose: bool,
    ) -> Result<Self> {
        let workspace_dir = match workspace_dir {
            Some(dir) => dir,
            None => std::env::current_dir().context("Failed to get current directory")?,
        };

        let file = Self::read_file(&workspace_dir.join(CONFIG_FILE))?;

        let org = org_flag
            .or_else(|| std::env::var(ENV_ORG).ok())
            .or(file.org);
        let token = token_flag.or_else(|| std::env::var(ENV_TOKEN).ok());
        let api_url = file.api_url.unwrap_or_else(|| GITHUB_API_URL.to_string());

        Ok(Config {
            workspace_dir,
            org,
            token,
            api_url,
            verbose,
        })
    }

    fn read_file(path: &Path) -> Result<ConfigFile> {
        if !path.exists() {
            return Ok(ConfigFile::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// The organization, required by every org-wide command.
    pub fn require_org(&self) -> Result<&str> {
        match self.org.as_deref() {
            Some(org) => Ok(org),
            None => bail!(
                "No organization configured. Pass --org, set {ENV_ORG}, or add `org` to {CONFIG_FILE}."
            ),
        }
    }

    /// The API token, required by every command that talks to GitHub.
    pub fn require_token(&self) -> Result<&str> {
        match self.token.as_deref() {
            Some(token) => Ok(token),
            None => bail!("No API token configured. Pass --token or set {ENV_TOKEN}."),
        }
    }
}
