//! Typed records for the GitHub REST responses corral consumes.
//!
//! Only the fields the aggregation layer and the CLI actually use are
//! modelled; display-only fields (avatars, html fragments) are dropped at the
//! deserialization boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A repository in the organization being coordinated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub private: bool,
    pub clone_url: String,
    pub default_branch: Option<String>,
}

/// An account reference as embedded in issues and events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub login: String,
}

/// A GitHub issue.
///
/// Pull requests also come through the issues endpoint; the `pull_request`
/// marker lets listings filter them out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: u64,
    pub number: i64,
    pub title: String,
    pub body: Option<String>,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user: Account,
    pub assignee: Option<Account>,
    #[serde(default)]
    pub labels: Vec<Label>,
    pub milestone: Option<Milestone>,
    pub pull_request: Option<serde_json::Value>,
}

impl Issue {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

/// A label. Unique by name within one repository only; labels with the same
/// name in different repositories are distinct entities unified by name for
/// reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    pub id: u64,
    pub name: String,
    pub color: String,
}

/// A milestone. `number` is its per-repository identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub id: u64,
    pub number: i64,
    pub title: String,
    pub state: String,
    #[serde(default)]
    pub open_issues: i64,
    #[serde(default)]
    pub closed_issues: i64,
}

/// A public event from a user's activity feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub repo: EventRepo,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRepo {
    pub name: String,
}

/// Server-side filters for issue listings.
#[derive(Debug, Clone, Default)]
pub struct IssueFilter {
    pub state: Option<String>,
    pub labels: Option<String>,
    pub milestone: Option<String>,
    pub assignee: Option<String>,
}
