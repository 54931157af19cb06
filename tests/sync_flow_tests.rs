// End-to-end flows through the router with in-memory infrastructure: a
// Jira issue plus its worklogs, from webhook delivery to link records and
// remote call ordering.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use time_sync::adapters::in_memory::{
    InMemoryIntegrationStore, InMemoryLinkStore, InMemoryRemoteFactory, InMemoryRemoteProject,
};
use time_sync::application::reconcile::Reconciler;
use time_sync::core::config::{ActiveCollabTarget, IntegrationConfig, SyncDefaults};
use time_sync::core::link::EntityKind;
use time_sync::shell::http::router;
use time_sync::shell::state::AppState;

const PROJECT: &str = "10001";
const AUTHOR: &str = "acc-42";

struct World {
    links: Arc<InMemoryLinkStore>,
    remote: Arc<InMemoryRemoteProject>,
    app: axum::Router,
}

fn world() -> World {
    let links = Arc::new(InMemoryLinkStore::new());
    let integrations = Arc::new(InMemoryIntegrationStore::with_configs(vec![
        IntegrationConfig {
            id: "cfg-1".into(),
            source_project_id: PROJECT.into(),
            source_account_id: Some(AUTHOR.into()),
            activecollab: ActiveCollabTarget {
                base_url: "https://app.activecollab.com/1".into(),
                project_id: 77,
                token: "9-test-token".into(),
            },
            defaults: SyncDefaults {
                job_type_id: 7,
                billable_status: 2,
                subscribers: vec![2, 3],
            },
        },
    ]));
    let remote = Arc::new(InMemoryRemoteProject::new(77));
    let reconciler = Arc::new(Reconciler::new(
        links.clone(),
        integrations,
        Arc::new(InMemoryRemoteFactory::new(remote.clone())),
    ));
    let app = router(AppState { reconciler });
    World { links, remote, app }
}

fn jira_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .header("x-atlassian-webhook-identifier", "d-1")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn issue_event(event: &str, resolutiondate: Option<&str>) -> serde_json::Value {
    json!({
        "webhookEvent": event,
        "issue": {
            "key": "SYN-12",
            "self": "https://acme.atlassian.net/rest/api/2/issue/10002",
            "fields": {
                "summary": "Fix login",
                "description": "Broken.",
                "resolutiondate": resolutiondate,
            },
        },
        "user": { "accountId": AUTHOR },
    })
}

fn worklog_event(event: &str) -> serde_json::Value {
    json!({
        "webhookEvent": event,
        "worklog": {
            "author": { "accountId": AUTHOR },
            "comment": "pairing",
            "started": "2024-01-01T09:00:00.000+0000",
            "timeSpentSeconds": 9000,
        },
    })
}

#[tokio::test]
async fn issue_lifecycle_creates_completes_and_deletes_the_remote_task() {
    let w = world();
    let issue_uri = format!("/hooks/jira/project/{PROJECT}/issue/10002");

    let response = w
        .app
        .clone()
        .oneshot(jira_request(&issue_uri, issue_event("jira:issue_created", None)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let task_link = w
        .links
        .find_link(EntityKind::Task, "10002")
        .await
        .expect("task link missing");
    assert!(w.remote.task_exists(task_link.target_id).await);

    // Resolving the issue completes the remote task with a dedicated call.
    let response = w
        .app
        .clone()
        .oneshot(jira_request(
            &issue_uri,
            issue_event("jira:issue_updated", Some("2024-02-01T10:00:00.000+0000")),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(w
        .remote
        .calls()
        .await
        .contains(&format!("complete_task({})", task_link.target_id)));

    let response = w
        .app
        .clone()
        .oneshot(jira_request(&issue_uri, issue_event("jira:issue_deleted", None)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(w.links.records().await.is_empty());
    assert!(!w.remote.task_exists(task_link.target_id).await);
}

#[tokio::test]
async fn worklog_is_filed_under_the_issues_task_and_follows_it() {
    let w = world();
    let issue_uri = format!("/hooks/jira/project/{PROJECT}/issue/10002");
    let worklog_uri = format!("/hooks/jira/project/{PROJECT}/issue/10002/worklog/555");

    w.app
        .clone()
        .oneshot(jira_request(&issue_uri, issue_event("jira:issue_created", None)))
        .await
        .unwrap();
    let task_target = w
        .links
        .find_link(EntityKind::Task, "10002")
        .await
        .unwrap()
        .target_id;

    let response = w
        .app
        .clone()
        .oneshot(jira_request(&worklog_uri, worklog_event("worklog_created")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let time_link = w
        .links
        .find_link(EntityKind::TimeEntry, "555")
        .await
        .expect("time link missing");
    assert_eq!(time_link.target_parent_id, Some(task_target));
    assert_eq!(time_link.target_parent_type.as_deref(), Some("Task"));

    let payload = w.remote.last_time_payload().await.expect("no time write");
    assert_eq!(payload.value, "02:30");
    assert_eq!(payload.record_date, "2024-01-01");
    assert_eq!(payload.job_type_id, 7);

    // Replaying the update converges without duplicating anything.
    let response = w
        .app
        .clone()
        .oneshot(jira_request(&worklog_uri, worklog_event("worklog_updated")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(w.links.records().await.len(), 2);
}

#[tokio::test]
async fn worklog_update_recreates_remotely_deleted_entry() {
    let w = world();
    let worklog_uri = format!("/hooks/jira/project/{PROJECT}/issue/10002/worklog/555");

    w.app
        .clone()
        .oneshot(jira_request(&worklog_uri, worklog_event("worklog_created")))
        .await
        .unwrap();
    let old_target = w
        .links
        .find_link(EntityKind::TimeEntry, "555")
        .await
        .unwrap()
        .target_id;
    w.remote.remove_time(old_target).await;

    let response = w
        .app
        .clone()
        .oneshot(jira_request(&worklog_uri, worklog_event("worklog_updated")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let relinked = w
        .links
        .find_link(EntityKind::TimeEntry, "555")
        .await
        .unwrap();
    assert_ne!(relinked.target_id, old_target);
    assert!(w.remote.time_exists(relinked.target_id).await);
}

#[tokio::test]
async fn worklog_delete_is_idempotent_across_replays() {
    let w = world();
    let worklog_uri = format!("/hooks/jira/project/{PROJECT}/issue/10002/worklog/555");

    w.app
        .clone()
        .oneshot(jira_request(&worklog_uri, worklog_event("worklog_created")))
        .await
        .unwrap();

    for _ in 0..2 {
        let response = w
            .app
            .clone()
            .oneshot(jira_request(&worklog_uri, worklog_event("worklog_deleted")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
    assert!(w.links.find_link(EntityKind::TimeEntry, "555").await.is_none());
}
