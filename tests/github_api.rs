//! HTTP-level tests of the pagination and fan-out aggregation layer against
//! a mock GitHub API.

use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use corral::github::client::GithubClient;
use corral::github::org::{OrgAggregator, user_events};

fn aggregator(server: &MockServer) -> OrgAggregator {
    let client = GithubClient::with_base_url("gho_test", &server.uri()).unwrap();
    OrgAggregator::new(client, "acme")
}

fn repo_json(name: &str, id: u64) -> Value {
    json!({
        "id": id,
        "name": name,
        "full_name": format!("acme/{name}"),
        "private": false,
        "clone_url": format!("https://github.com/acme/{name}.git"),
        "default_branch": "main"
    })
}

fn milestone_json(number: i64, title: &str) -> Value {
    json!({
        "id": number as u64 * 100,
        "number": number,
        "title": title,
        "state": "open",
        "open_issues": 2,
        "closed_issues": 1
    })
}

/// Mount a single-page repository listing for the organization.
async fn mount_repos(server: &MockServer, repos: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/orgs/acme/repos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(repos))
        .mount(server)
        .await;
}

#[tokio::test]
async fn repository_listing_walks_every_page_in_order() {
    let server = MockServer::start().await;

    let link = format!(
        "<{0}/orgs/acme/repos?per_page=100&page=2>; rel=\"next\", \
         <{0}/orgs/acme/repos?per_page=100&page=3>; rel=\"last\"",
        server.uri()
    );
    Mock::given(method("GET"))
        .and(path("/orgs/acme/repos"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([repo_json("alpha", 1)]))
                .insert_header("link", link.as_str()),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orgs/acme/repos"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([repo_json("beta", 2)])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orgs/acme/repos"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([repo_json("gamma", 3)])))
        .mount(&server)
        .await;

    let repos = aggregator(&server).list_repositories().await.unwrap();
    let names: Vec<&str> = repos.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "beta", "gamma"]);
}

#[tokio::test]
async fn repository_entries_without_id_are_dropped() {
    let server = MockServer::start().await;
    mount_repos(
        &server,
        vec![
            repo_json("alpha", 1),
            json!({"name": "broken", "full_name": "acme/broken"}),
            repo_json("beta", 2),
        ],
    )
    .await;

    let repos = aggregator(&server).list_repositories().await.unwrap();
    let names: Vec<&str> = repos.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "beta"]);
}

#[tokio::test]
async fn unauthorized_first_page_fails_the_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orgs/acme/repos"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = aggregator(&server).list_repositories().await.unwrap_err();
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn milestone_listing_excludes_failing_repository_but_keeps_the_rest() {
    let server = MockServer::start().await;
    mount_repos(
        &server,
        vec![
            repo_json("alpha", 1),
            repo_json("beta", 2),
            repo_json("gamma", 3),
        ],
    )
    .await;

    for repo in ["alpha", "gamma"] {
        Mock::given(method("GET"))
            .and(path(format!("/repos/acme/{repo}/milestones")))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([milestone_json(1, "v1.0")])),
            )
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/repos/acme/beta/milestones"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let grouped = aggregator(&server).list_milestones().await.unwrap();
    assert_eq!(grouped.len(), 1);
    let entries = grouped.get("v1.0").unwrap();
    let repos: Vec<&str> = entries.iter().map(|e| e.repo.as_str()).collect();
    assert_eq!(repos, vec!["alpha", "gamma"]);
}

#[tokio::test]
async fn label_listing_groups_by_name_across_repositories() {
    let server = MockServer::start().await;
    mount_repos(&server, vec![repo_json("alpha", 1), repo_json("beta", 2)]).await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/alpha/labels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "bug", "color": "ee0701"},
            {"id": 2, "name": "triage", "color": "ffffff"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/beta/labels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 3, "name": "bug", "color": "d73a4a"}
        ])))
        .mount(&server)
        .await;

    let grouped = aggregator(&server).list_labels().await.unwrap();
    let keys: Vec<&str> = grouped.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["bug", "triage"]);
    assert_eq!(grouped.get("bug").unwrap().len(), 2);
    assert_eq!(grouped.get("triage").unwrap().len(), 1);
}

#[tokio::test]
async fn label_listing_walks_every_page_of_each_repository() {
    let server = MockServer::start().await;
    mount_repos(&server, vec![repo_json("alpha", 1)]).await;

    let link = format!(
        "<{0}/repos/acme/alpha/labels?per_page=100&page=2>; rel=\"next\", \
         <{0}/repos/acme/alpha/labels?per_page=100&page=2>; rel=\"last\"",
        server.uri()
    );
    Mock::given(method("GET"))
        .and(path("/repos/acme/alpha/labels"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"id": 1, "name": "bug", "color": "ee0701"}]))
                .insert_header("link", link.as_str()),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/alpha/labels"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 2, "name": "page-two-label", "color": "ffffff"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let grouped = aggregator(&server).list_labels().await.unwrap();
    let keys: Vec<&str> = grouped.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["bug", "page-two-label"]);
}

#[tokio::test]
async fn delete_label_sends_the_name_as_one_encoded_path_segment() {
    let server = MockServer::start().await;
    mount_repos(&server, vec![repo_json("alpha", 1)]).await;

    Mock::given(method("DELETE"))
        .and(path("/repos/acme/alpha/labels/area%2Fui%20polish"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let report = aggregator(&server).delete_label("area/ui polish").await.unwrap();
    assert_eq!(report.rejected_count(), 0);
}

#[tokio::test]
async fn create_label_reports_per_repository_outcomes() {
    let server = MockServer::start().await;
    mount_repos(&server, vec![repo_json("alpha", 1), repo_json("beta", 2)]).await;

    Mock::given(method("POST"))
        .and(path("/repos/acme/alpha/labels"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"id": 10, "name": "triage", "color": "ffffff"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    // beta already has the label.
    Mock::given(method("POST"))
        .and(path("/repos/acme/beta/labels"))
        .respond_with(ResponseTemplate::new(422))
        .expect(1)
        .mount(&server)
        .await;

    let report = aggregator(&server)
        .create_label("triage", "ffffff")
        .await
        .unwrap();
    assert_eq!(report.len(), 2);
    assert_eq!(report.rejected_count(), 1);

    let outcomes: Vec<(&str, bool)> = report
        .iter()
        .map(|(name, outcome)| (name, outcome.is_fulfilled()))
        .collect();
    assert_eq!(outcomes, vec![("alpha", true), ("beta", false)]);
}

#[tokio::test]
async fn delete_milestone_resolves_title_and_skips_repos_without_it() {
    let server = MockServer::start().await;
    mount_repos(&server, vec![repo_json("alpha", 1), repo_json("beta", 2)]).await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/alpha/milestones"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([milestone_json(7, "v1.0"), milestone_json(8, "v2.0")])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/beta/milestones"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([milestone_json(3, "v2.0")])))
        .mount(&server)
        .await;
    // Only alpha holds v1.0; only its milestone number 7 may be deleted.
    Mock::given(method("DELETE"))
        .and(path("/repos/acme/alpha/milestones/7"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let report = aggregator(&server).delete_milestone("v1.0").await.unwrap();
    assert_eq!(report.len(), 2);
    assert_eq!(report.rejected_count(), 1);
    for (name, outcome) in report.iter() {
        match name {
            "alpha" => assert!(outcome.is_fulfilled()),
            "beta" => {
                let detail = outcome.rejection().unwrap();
                assert!(detail.message.contains("No milestone named v1.0"));
            }
            other => panic!("unexpected repo {other}"),
        }
    }
}

#[tokio::test]
async fn delete_milestone_finds_the_title_beyond_the_first_page() {
    let server = MockServer::start().await;
    mount_repos(&server, vec![repo_json("alpha", 1)]).await;

    let link = format!(
        "<{0}/repos/acme/alpha/milestones?per_page=100&page=2>; rel=\"next\", \
         <{0}/repos/acme/alpha/milestones?per_page=100&page=2>; rel=\"last\"",
        server.uri()
    );
    Mock::given(method("GET"))
        .and(path("/repos/acme/alpha/milestones"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([milestone_json(1, "v1.0")]))
                .insert_header("link", link.as_str()),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/alpha/milestones"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([milestone_json(9, "v3.0")])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/repos/acme/alpha/milestones/9"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let report = aggregator(&server).delete_milestone("v3.0").await.unwrap();
    assert_eq!(report.rejected_count(), 0);
}

#[tokio::test]
async fn issue_listing_flattens_repositories_and_filters_pull_requests() {
    let server = MockServer::start().await;
    mount_repos(&server, vec![repo_json("alpha", 1), repo_json("beta", 2)]).await;

    let issue = |id: u64, number: i64, title: &str, pr: bool| {
        let mut value = json!({
            "id": id,
            "number": number,
            "title": title,
            "body": null,
            "state": "open",
            "created_at": "2024-03-01T10:00:00Z",
            "updated_at": "2024-03-01T10:00:00Z",
            "user": {"login": "alice"},
            "assignee": null,
            "labels": [],
            "milestone": null
        });
        if pr {
            value["pull_request"] = json!({"url": "https://api.github.com/x"});
        }
        value
    };

    Mock::given(method("GET"))
        .and(path("/repos/acme/alpha/issues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            issue(1, 11, "real issue", false),
            issue(2, 12, "a pull request", true)
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/beta/issues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            issue(3, 5, "another issue", false)
        ])))
        .mount(&server)
        .await;

    let issues = aggregator(&server)
        .list_issues(&Default::default())
        .await
        .unwrap();
    let titles: Vec<&str> = issues.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["real issue", "another issue"]);
}

#[tokio::test]
async fn user_events_flatten_paginated_feed() {
    let server = MockServer::start().await;

    let link = format!(
        "<{0}/users/alice/events?per_page=100&page=2>; rel=\"next\", \
         <{0}/users/alice/events?per_page=100&page=2>; rel=\"last\"",
        server.uri()
    );
    let event = |id: &str| {
        json!({
            "id": id,
            "type": "PushEvent",
            "repo": {"name": "acme/alpha"},
            "created_at": "2024-03-01T10:00:00Z"
        })
    };
    Mock::given(method("GET"))
        .and(path("/users/alice/events"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([event("1"), event("2")]))
                .insert_header("link", link.as_str()),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/alice/events"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([event("3")])))
        .mount(&server)
        .await;

    // User feeds need no organization, only a client.
    let client = GithubClient::with_base_url("gho_test", &server.uri()).unwrap();
    let events = user_events(&client, "alice").await.unwrap();
    let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
}
