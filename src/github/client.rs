//! Authenticated GitHub REST client.
//!
//! One method per endpoint corral consumes; pagination and fan-out live in
//! `page` and `fanout`, merge logic in `org`. The base URL is overridable so
//! tests can point the client at a local mock server.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::errors::GithubError;
use crate::github::models::{Event, Issue, IssueFilter, Label, Milestone, Repository};
use crate::github::page::{PAGE_SIZE, Page, PageCursor, decode_items};

pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Per-request timeout. A timed-out call surfaces as a transport error for
/// that call alone; in-flight calls for other repositories continue.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    token: String,
    base_url: String,
}

impl GithubClient {
    pub fn new(token: &str) -> Result<Self, GithubError> {
        Self::with_base_url(token, GITHUB_API_URL)
    }

    /// Build a client against a non-default API root (mock servers in tests,
    /// GitHub Enterprise hosts).
    pub fn with_base_url(token: &str, base_url: &str) -> Result<Self, GithubError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("corral/0.1"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(GithubError::Client)?;

        Ok(GithubClient {
            http,
            token: token.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    // ── listing endpoints ────────────────────────────────────────────

    pub async fn org_repos_page(&self, org: &str, page: u32) -> Result<Page<Repository>, GithubError> {
        let url = format!("{}/orgs/{}/repos", self.base_url, org);
        self.get_page(url, &[("type", "all".to_string())], page).await
    }

    pub async fn repo_issues_page(
        &self,
        owner: &str,
        repo: &str,
        filter: &IssueFilter,
        page: u32,
    ) -> Result<Page<Issue>, GithubError> {
        let url = format!("{}/repos/{}/{}/issues", self.base_url, owner, repo);
        self.get_page(url, &issue_query(filter), page).await
    }

    pub async fn user_events_page(&self, user: &str, page: u32) -> Result<Page<Event>, GithubError> {
        let url = format!("{}/users/{}/events", self.base_url, user);
        self.get_page(url, &[], page).await
    }

    pub async fn repo_labels_page(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
    ) -> Result<Page<Label>, GithubError> {
        let url = format!("{}/repos/{}/{}/labels", self.base_url, owner, repo);
        self.get_page(url, &[], page).await
    }

    pub async fn repo_milestones_page(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
    ) -> Result<Page<Milestone>, GithubError> {
        let url = format!("{}/repos/{}/{}/milestones", self.base_url, owner, repo);
        self.get_page(url, &[("state", "all".to_string())], page)
            .await
    }

    // ── mutating endpoints ───────────────────────────────────────────

    pub async fn create_label(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
        color: &str,
    ) -> Result<Label, GithubError> {
        let url = format!("{}/repos/{}/{}/labels", self.base_url, owner, repo);
        let resp = self
            .send(self.http.post(&url).json(&json!({ "name": name, "color": color })), &url)
            .await?;
        resp.json().await.map_err(|source| GithubError::Decode { url, source })
    }

    pub async fn delete_label(&self, owner: &str, repo: &str, name: &str) -> Result<(), GithubError> {
        // Label names may carry slashes, spaces, or `#`; they must travel as
        // a single encoded path segment.
        let url = format!(
            "{}/repos/{}/{}/labels/{}",
            self.base_url,
            owner,
            repo,
            urlencoding::encode(name)
        );
        self.send(self.http.delete(&url), &url).await?;
        Ok(())
    }

    pub async fn create_milestone(
        &self,
        owner: &str,
        repo: &str,
        title: &str,
    ) -> Result<Milestone, GithubError> {
        let url = format!("{}/repos/{}/{}/milestones", self.base_url, owner, repo);
        let resp = self
            .send(self.http.post(&url).json(&json!({ "title": title })), &url)
            .await?;
        resp.json().await.map_err(|source| GithubError::Decode { url, source })
    }

    pub async fn delete_milestone(
        &self,
        owner: &str,
        repo: &str,
        number: i64,
    ) -> Result<(), GithubError> {
        let url = format!(
            "{}/repos/{}/{}/milestones/{}",
            self.base_url, owner, repo, number
        );
        self.send(self.http.delete(&url), &url).await?;
        Ok(())
    }

    // ── plumbing ─────────────────────────────────────────────────────

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<reqwest::Response, GithubError> {
        let resp = request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|source| GithubError::Transport {
                url: url.to_string(),
                source,
            })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(GithubError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(resp)
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        url: String,
        query: &[(&str, String)],
        page: u32,
    ) -> Result<Page<T>, GithubError> {
        let request = self
            .http
            .get(&url)
            .query(query)
            .query(&[("per_page", PAGE_SIZE.to_string()), ("page", page.to_string())]);
        let resp = self.send(request, &url).await?;
        let cursor = resp
            .headers()
            .get("link")
            .and_then(|value| value.to_str().ok())
            .and_then(PageCursor::from_link_header);
        let raw: Vec<serde_json::Value> = resp
            .json()
            .await
            .map_err(|source| GithubError::Decode { url, source })?;
        Ok(Page {
            items: decode_items(raw),
            cursor,
        })
    }
}

fn issue_query(filter: &IssueFilter) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(state) = &filter.state {
        query.push(("state", state.clone()));
    }
    if let Some(labels) = &filter.labels {
        query.push(("labels", labels.clone()));
    }
    if let Some(milestone) = &filter.milestone {
        query.push(("milestone", milestone.clone()));
    }
    if let Some(assignee) = &filter.assignee {
        query.push(("assignee", assignee.clone()));
    }
    query
}
