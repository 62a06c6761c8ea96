//! Concurrent fan-out of one per-repository operation across a repository
//! set.
//!
//! The join is always "all settled": a single unreachable or rate-limited
//! repository must not block the report for the rest, so individual failures
//! are captured per repository instead of propagated. No retries and no
//! throttling — organizations here are tens of repositories, not thousands.

use std::collections::HashMap;
use std::future::Future;

use futures::future::join_all;

use crate::errors::GithubError;
use crate::github::models::Repository;

/// The outcome of one repository's operation after it has settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled<T> {
    Fulfilled(T),
    Rejected(ErrorDetail),
}

impl<T> Settled<T> {
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, Settled::Fulfilled(_))
    }

    pub fn rejection(&self) -> Option<&ErrorDetail> {
        match self {
            Settled::Rejected(detail) => Some(detail),
            Settled::Fulfilled(_) => None,
        }
    }
}

/// Failure detail preserved for per-repository reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail {
    pub message: String,
    pub status: Option<u16>,
}

impl From<&GithubError> for ErrorDetail {
    fn from(err: &GithubError) -> Self {
        ErrorDetail {
            message: err.to_string(),
            status: err.status(),
        }
    }
}

/// Apply `op` to every repository concurrently and wait for all to settle.
///
/// The returned map has exactly one entry per input repository, keyed by
/// repository name — no entry is dropped on failure. The map is keyed, not
/// ordered; callers present it in whatever order they hold the repositories.
pub async fn fan_out<T, F, Fut>(repos: &[Repository], op: F) -> HashMap<String, Settled<T>>
where
    F: Fn(Repository) -> Fut,
    Fut: Future<Output = Result<T, GithubError>>,
{
    let tasks = repos.iter().map(|repo| {
        let name = repo.name.clone();
        let fut = op(repo.clone());
        async move { (name, fut.await) }
    });

    let mut settled = HashMap::with_capacity(repos.len());
    for (name, result) in join_all(tasks).await {
        let outcome = match result {
            Ok(value) => Settled::Fulfilled(value),
            Err(err) => Settled::Rejected(ErrorDetail::from(&err)),
        };
        settled.insert(name, outcome);
    }
    settled
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn repo(name: &str, id: u64) -> Repository {
        Repository {
            id,
            name: name.to_string(),
            full_name: format!("acme/{name}"),
            private: false,
            clone_url: format!("https://github.com/acme/{name}.git"),
            default_branch: Some("main".to_string()),
        }
    }

    #[tokio::test]
    async fn every_repository_gets_exactly_one_entry() {
        let repos = vec![repo("alpha", 1), repo("beta", 2), repo("gamma", 3)];
        let settled = fan_out(&repos, |r| async move { Ok(r.id) }).await;
        assert_eq!(settled.len(), 3);
        assert_eq!(settled["alpha"], Settled::Fulfilled(1));
        assert_eq!(settled["beta"], Settled::Fulfilled(2));
        assert_eq!(settled["gamma"], Settled::Fulfilled(3));
    }

    #[tokio::test]
    async fn failures_are_captured_not_propagated() {
        let repos = vec![repo("alpha", 1), repo("beta", 2), repo("gamma", 3)];
        let settled = fan_out(&repos, |r| async move {
            if r.name == "beta" {
                Err(GithubError::Status {
                    status: 403,
                    url: format!("https://api.github.com/repos/{}/labels", r.full_name),
                })
            } else {
                Ok(r.name)
            }
        })
        .await;

        assert_eq!(settled.len(), 3);
        assert!(settled["alpha"].is_fulfilled());
        assert!(settled["gamma"].is_fulfilled());
        let detail = settled["beta"].rejection().unwrap();
        assert_eq!(detail.status, Some(403));
        assert!(detail.message.contains("403"));
    }

    #[tokio::test]
    async fn all_failures_still_resolve_with_full_map() {
        let repos = vec![repo("alpha", 1), repo("beta", 2)];
        let settled: HashMap<String, Settled<()>> = fan_out(&repos, |r| async move {
            Err(GithubError::MilestoneNotFound {
                title: "v9".into(),
                repo: r.name,
            })
        })
        .await;
        assert_eq!(settled.len(), 2);
        assert!(settled.values().all(|s| !s.is_fulfilled()));
    }

    #[tokio::test]
    async fn one_slow_repository_does_not_block_capture_of_others() {
        // All tasks settle; the slow one just settles last.
        let repos = vec![repo("slow", 1), repo("fast", 2)];
        let settled = fan_out(&repos, |r| async move {
            if r.name == "slow" {
                tokio::time::sleep(Duration::from_millis(30)).await;
            }
            Ok(r.name.clone())
        })
        .await;
        assert_eq!(settled.len(), 2);
        assert_eq!(settled["fast"], Settled::Fulfilled("fast".to_string()));
        assert_eq!(settled["slow"], Settled::Fulfilled("slow".to_string()));
    }

    #[tokio::test]
    async fn empty_repository_set_yields_empty_map() {
        let settled: HashMap<String, Settled<u64>> =
            fan_out(&[], |r| async move { Ok(r.id) }).await;
        assert!(settled.is_empty());
    }
}
