//! Org-wide operations: enumerate the repository set, fan a per-repository
//! call out across it, and merge the results.
//!
//! Partial-failure policy is uniform per operation class: listing operations
//! are lenient (rejected repositories are logged and excluded from the merged
//! index), mutating operations return the full settled map so the caller can
//! report per repository.

use std::collections::HashMap;

use tracing::warn;

use crate::errors::GithubError;
use crate::github::client::GithubClient;
use crate::github::fanout::{Settled, fan_out};
use crate::github::index::{Grouped, NO_MILESTONE, group_by};
use crate::github::models::{Event, Issue, IssueFilter, Label, Milestone, Repository};
use crate::github::page::fetch_all;

/// A label together with the repository it lives in. Labels with the same
/// name in different repositories stay distinct entities.
#[derive(Debug, Clone)]
pub struct RepoLabel {
    pub repo: String,
    pub label: Label,
}

/// A milestone together with its owning repository.
#[derive(Debug, Clone)]
pub struct RepoMilestone {
    pub repo: String,
    pub milestone: Milestone,
}

/// The outcome of a mutating fan-out: the repository working set (in fetch
/// order) plus one settled result per repository.
#[derive(Debug)]
pub struct FanOutReport<T> {
    repos: Vec<Repository>,
    settled: HashMap<String, Settled<T>>,
}

impl<T> FanOutReport<T> {
    /// Per-repository outcomes in repository-list order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Settled<T>)> {
        self.repos
            .iter()
            .filter_map(|repo| Some((repo.name.as_str(), self.settled.get(&repo.name)?)))
    }

    pub fn len(&self) -> usize {
        self.repos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }

    pub fn rejected_count(&self) -> usize {
        self.settled.values().filter(|s| !s.is_fulfilled()).count()
    }
}

pub struct OrgAggregator {
    client: GithubClient,
    org: String,
}

impl OrgAggregator {
    pub fn new(client: GithubClient, org: impl Into<String>) -> Self {
        OrgAggregator {
            client,
            org: org.into(),
        }
    }

    pub fn org(&self) -> &str {
        &self.org
    }

    /// Every repository of the organization, across all pages.
    pub async fn list_repositories(&self) -> Result<Vec<Repository>, GithubError> {
        fetch_all(|page| self.client.org_repos_page(&self.org, page)).await
    }

    /// Every issue of every repository, flattened. Pull requests are
    /// excluded; repositories whose fetch fails are logged and skipped.
    pub async fn list_issues(&self, filter: &IssueFilter) -> Result<Vec<Issue>, GithubError> {
        let repos = self.list_repositories().await?;
        let mut settled = fan_out(&repos, |repo| {
            let client = self.client.clone();
            let org = self.org.clone();
            let filter = filter.clone();
            async move {
                let issues =
                    fetch_all(|page| client.repo_issues_page(&org, &repo.name, &filter, page))
                        .await?;
                Ok(issues
                    .into_iter()
                    .filter(|issue| !issue.is_pull_request())
                    .collect::<Vec<_>>())
            }
        })
        .await;

        let mut all = Vec::new();
        for repo in &repos {
            match settled.remove(&repo.name) {
                Some(Settled::Fulfilled(issues)) => all.extend(issues),
                Some(Settled::Rejected(detail)) => {
                    warn!(repo = %repo.name, error = %detail.message, "skipping repository in issue listing");
                }
                None => {}
            }
        }
        Ok(all)
    }

    /// All labels across the organization, grouped by label name in
    /// first-seen order.
    pub async fn list_labels(&self) -> Result<Grouped<RepoLabel>, GithubError> {
        let repos = self.list_repositories().await?;
        let mut settled = fan_out(&repos, |repo| {
            let client = self.client.clone();
            let org = self.org.clone();
            async move { fetch_all(|page| client.repo_labels_page(&org, &repo.name, page)).await }
        })
        .await;

        let mut flat = Vec::new();
        for repo in &repos {
            match settled.remove(&repo.name) {
                Some(Settled::Fulfilled(labels)) => {
                    flat.extend(labels.into_iter().map(|label| RepoLabel {
                        repo: repo.name.clone(),
                        label,
                    }));
                }
                Some(Settled::Rejected(detail)) => {
                    warn!(repo = %repo.name, error = %detail.message, "skipping repository in label listing");
                }
                None => {}
            }
        }
        Ok(group_by(flat, |entry| entry.label.name.clone()))
    }

    /// All milestones across the organization, grouped by title in first-seen
    /// order.
    pub async fn list_milestones(&self) -> Result<Grouped<RepoMilestone>, GithubError> {
        let repos = self.list_repositories().await?;
        let mut settled = fan_out(&repos, |repo| {
            let client = self.client.clone();
            let org = self.org.clone();
            async move {
                fetch_all(|page| client.repo_milestones_page(&org, &repo.name, page)).await
            }
        })
        .await;

        let mut flat = Vec::new();
        for repo in &repos {
            match settled.remove(&repo.name) {
                Some(Settled::Fulfilled(milestones)) => {
                    flat.extend(milestones.into_iter().map(|milestone| RepoMilestone {
                        repo: repo.name.clone(),
                        milestone,
                    }));
                }
                Some(Settled::Rejected(detail)) => {
                    warn!(repo = %repo.name, error = %detail.message, "skipping repository in milestone listing");
                }
                None => {}
            }
        }
        Ok(group_by(flat, |entry| entry.milestone.title.clone()))
    }

    /// Create a label in every repository. Per-repository failures stay in
    /// the report; nothing aborts.
    pub async fn create_label(
        &self,
        name: &str,
        color: &str,
    ) -> Result<FanOutReport<Label>, GithubError> {
        let repos = self.list_repositories().await?;
        let settled = fan_out(&repos, |repo| {
            let client = self.client.clone();
            let org = self.org.clone();
            let name = name.to_string();
            let color = color.to_string();
            async move { client.create_label(&org, &repo.name, &name, &color).await }
        })
        .await;
        Ok(FanOutReport { repos, settled })
    }

    /// Delete a label from every repository that has it.
    pub async fn delete_label(&self, name: &str) -> Result<FanOutReport<()>, GithubError> {
        let repos = self.list_repositories().await?;
        let settled = fan_out(&repos, |repo| {
            let client = self.client.clone();
            let org = self.org.clone();
            let name = name.to_string();
            async move { client.delete_label(&org, &repo.name, &name).await }
        })
        .await;
        Ok(FanOutReport { repos, settled })
    }

    /// Create a milestone in every repository.
    pub async fn create_milestone(&self, title: &str) -> Result<FanOutReport<Milestone>, GithubError> {
        let repos = self.list_repositories().await?;
        let settled = fan_out(&repos, |repo| {
            let client = self.client.clone();
            let org = self.org.clone();
            let title = title.to_string();
            async move { client.create_milestone(&org, &repo.name, &title).await }
        })
        .await;
        Ok(FanOutReport { repos, settled })
    }

    /// Delete the milestone with the given title from every repository.
    ///
    /// Milestones are addressed by per-repository number, so each task first
    /// resolves the title; a repository with no matching title rejects with
    /// `MilestoneNotFound` and issues no delete call.
    pub async fn delete_milestone(&self, title: &str) -> Result<FanOutReport<()>, GithubError> {
        let repos = self.list_repositories().await?;
        let settled = fan_out(&repos, |repo| {
            let client = self.client.clone();
            let org = self.org.clone();
            let title = title.to_string();
            async move {
                let milestones =
                    fetch_all(|page| client.repo_milestones_page(&org, &repo.name, page)).await?;
                match milestones.into_iter().find(|m| m.title == title) {
                    Some(milestone) => {
                        client
                            .delete_milestone(&org, &repo.name, milestone.number)
                            .await
                    }
                    None => Err(GithubError::MilestoneNotFound {
                        title,
                        repo: repo.name,
                    }),
                }
            }
        })
        .await;
        Ok(FanOutReport { repos, settled })
    }

}

/// A user's public activity feed, across all pages. User feeds are not scoped
/// to an organization, so this takes a bare client.
pub async fn user_events(client: &GithubClient, user: &str) -> Result<Vec<Event>, GithubError> {
    fetch_all(|page| client.user_events_page(user, page)).await
}

/// Group issues by milestone title, with a sentinel group for issues that
/// carry none.
pub fn issues_by_milestone(issues: Vec<Issue>) -> Grouped<Issue> {
    group_by(issues, |issue| {
        issue
            .milestone
            .as_ref()
            .map(|m| m.title.clone())
            .unwrap_or_else(|| NO_MILESTONE.to_string())
    })
}
