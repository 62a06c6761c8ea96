//! Thin async wrapper around the `git` command line.
//!
//! This layer only decides which commands to run and how to interpret their
//! exit status; working-copy semantics belong to git itself.

use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::debug;

use crate::errors::VcsError;

#[derive(Debug, Clone, Default)]
pub struct VcsRunner;

impl VcsRunner {
    pub fn new() -> Self {
        VcsRunner
    }

    pub async fn clone_repo(&self, parent: &Path, url: &str, dir: &str) -> Result<(), VcsError> {
        self.git(parent, &["clone", url, dir]).await.map(|_| ())
    }

    pub async fn fetch(&self, dir: &Path) -> Result<(), VcsError> {
        self.git(dir, &["fetch", "--all", "--prune"]).await.map(|_| ())
    }

    pub async fn checkout(&self, dir: &Path, branch: &str) -> Result<(), VcsError> {
        self.git(dir, &["checkout", branch]).await.map(|_| ())
    }

    pub async fn reset_hard(&self, dir: &Path, target: &str) -> Result<(), VcsError> {
        self.git(dir, &["reset", "--hard", target]).await.map(|_| ())
    }

    pub async fn create_branch(&self, dir: &Path, branch: &str) -> Result<(), VcsError> {
        self.git(dir, &["checkout", "-b", branch]).await.map(|_| ())
    }

    pub async fn push_branch(&self, dir: &Path, branch: &str) -> Result<(), VcsError> {
        self.git(dir, &["push", "--set-upstream", "origin", branch])
            .await
            .map(|_| ())
    }

    pub async fn commit_all(&self, dir: &Path, message: &str) -> Result<(), VcsError> {
        self.git(dir, &["add", "--all"]).await?;
        self.git(dir, &["commit", "-m", message]).await.map(|_| ())
    }

    /// `git status --porcelain` output; empty means a clean working copy.
    pub async fn status(&self, dir: &Path) -> Result<String, VcsError> {
        self.git(dir, &["status", "--porcelain"]).await
    }

    async fn git(&self, dir: &Path, args: &[&str]) -> Result<String, VcsError> {
        debug!(dir = %dir.display(), ?args, "running git");
        let output = Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .await
            .map_err(|source| VcsError::Spawn {
                command: args.join(" "),
                source,
            })?;

        if !output.status.success() {
            return Err(VcsError::Failed {
                command: args.join(" "),
                code: output.status.code().unwrap_or(-1),
                dir: PathBuf::from(dir),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}
