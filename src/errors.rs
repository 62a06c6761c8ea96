//! Typed error hierarchy for corral.
//!
//! Four top-level enums cover the four subsystems:
//! - `GithubError` — REST API calls and pagination
//! - `VcsError` — shelled-out git commands
//! - `ManifestError` — workspace manifest loading
//! - `ReleaseError` — dependency-manifest rewrites

use thiserror::Error;

/// Errors from the GitHub API subsystem (client, pagination, fan-out ops).
#[derive(Debug, Error)]
pub enum GithubError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("GitHub returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("No milestone named {title} found in {repo}")]
    MilestoneNotFound { title: String, repo: String },
}

impl GithubError {
    /// HTTP status code attached to this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            GithubError::Status { status, .. } => Some(*status),
            GithubError::Transport { source, .. } | GithubError::Decode { source, .. } => {
                source.status().map(|s| s.as_u16())
            }
            _ => None,
        }
    }
}

/// Errors from running git commands against local working copies.
#[derive(Debug, Error)]
pub enum VcsError {
    #[error("Failed to spawn git ({command}): {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git {command} exited with {code} in {dir}: {stderr}")]
    Failed {
        command: String,
        code: i32,
        dir: std::path::PathBuf,
        stderr: String,
    },
}

/// Errors from loading the workspace manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to read manifest at {path}: {source}")]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse manifest at {path}: {source}")]
    Parse {
        path: std::path::PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Manifest entry {key} is not a string URL")]
    EntryNotAString { key: String },

    #[error("Manifest entry {key} has an unrecognized repository URL: {url}")]
    BadRepositoryUrl { key: String, url: String },
}

/// Errors from the release-branch dependency rewrite.
#[derive(Debug, Error)]
pub enum ReleaseError {
    #[error("Failed to read package manifest at {path}: {source}")]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write package manifest at {path}: {source}")]
    Write {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Package manifest at {path} is not valid JSON: {source}")]
    Parse {
        path: std::path::PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Package manifest root is not an object")]
    NotAnObject,
}
