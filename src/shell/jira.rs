use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, info};

use crate::normalize;
use crate::shell::http::{ack, fail};
use crate::shell::state::AppState;

/// Atlassian stamps every webhook delivery with this header; requests
/// without it are rejected before any business logic runs.
const WEBHOOK_IDENTIFIER_HEADER: &str = "x-atlassian-webhook-identifier";

pub async fn handle_issue(
    State(state): State<AppState>,
    Path((project_id, issue_id)): Path<(String, String)>,
    headers: HeaderMap,
    body: Result<Json<normalize::jira::IssueEvent>, JsonRejection>,
) -> Response {
    if headers.get(WEBHOOK_IDENTIFIER_HEADER).is_none() {
        return fail("missing webhook identifier header");
    }
    let Json(event) = match body {
        Ok(body) => body,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };

    info!(
        project_id,
        issue_id,
        event_type = event.webhook_event,
        "jira issue webhook received"
    );

    let inbound = match normalize::jira::issue_event(&project_id, &issue_id, event) {
        Ok(inbound) => inbound,
        Err(error) => return fail(error.to_string()),
    };
    match state.reconciler.handle(inbound).await {
        Ok(()) => ack(),
        Err(error) => {
            error!(%error, project_id, issue_id, "issue reconciliation failed");
            fail(error.to_string())
        }
    }
}

pub async fn handle_worklog(
    State(state): State<AppState>,
    Path((project_id, issue_id, worklog_id)): Path<(String, String, String)>,
    headers: HeaderMap,
    body: Result<Json<normalize::jira::WorklogEvent>, JsonRejection>,
) -> Response {
    if headers.get(WEBHOOK_IDENTIFIER_HEADER).is_none() {
        return fail("missing webhook identifier header");
    }
    let Json(event) = match body {
        Ok(body) => body,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };

    info!(
        project_id,
        issue_id,
        worklog_id,
        event_type = event.webhook_event,
        "jira worklog webhook received"
    );

    let inbound = match normalize::jira::worklog_event(&project_id, &issue_id, &worklog_id, event) {
        Ok(inbound) => inbound,
        Err(error) => return fail(error.to_string()),
    };
    match state.reconciler.handle(inbound).await {
        Ok(()) => ack(),
        Err(error) => {
            error!(%error, project_id, worklog_id, "worklog reconciliation failed");
            fail(error.to_string())
        }
    }
}

#[cfg(test)]
mod jira_webhook_tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use rstest::rstest;
    use serde_json::json;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::application::reconcile::testing::{harness, AUTHOR, PROJECT};
    use crate::core::link::EntityKind;
    use crate::shell::http::router;
    use crate::shell::state::AppState;

    fn issue_body(event: &str) -> String {
        json!({
            "webhookEvent": event,
            "issue": {
                "key": "SYN-12",
                "self": "https://acme.atlassian.net/rest/api/2/issue/10002",
                "fields": { "summary": "Fix login", "description": "Broken." },
            },
            "user": { "accountId": AUTHOR },
        })
        .to_string()
    }

    fn request(uri: &str, body: String, with_identifier: bool) -> Request<Body> {
        let builder = Request::post(uri).header("content-type", "application/json");
        let builder = if with_identifier {
            builder.header("x-atlassian-webhook-identifier", "d-1")
        } else {
            builder
        };
        builder.body(Body::from(body)).unwrap()
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_reject_requests_without_the_identifier_header() {
        let h = harness();
        let app = router(AppState {
            reconciler: Arc::new(h.reconciler),
        });
        let uri = format!("/hooks/jira/project/{PROJECT}/issue/10002");
        let response = app
            .oneshot(request(&uri, issue_body("jira:issue_created"), false))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_acknowledge_a_reconciled_issue_event() {
        let h = harness();
        let links = h.links.clone();
        let app = router(AppState {
            reconciler: Arc::new(h.reconciler),
        });
        let uri = format!("/hooks/jira/project/{PROJECT}/issue/10002");
        let response = app
            .oneshot(request(&uri, issue_body("jira:issue_created"), true))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Success");
        assert!(links.find_link(EntityKind::Task, "10002").await.is_some());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_return_500_for_unsupported_event_types() {
        let h = harness();
        let app = router(AppState {
            reconciler: Arc::new(h.reconciler),
        });
        let uri = format!("/hooks/jira/project/{PROJECT}/issue/10002");
        let response = app
            .oneshot(request(&uri, issue_body("jira:issue_commented"), true))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_return_500_when_no_integration_matches() {
        let h = harness();
        let app = router(AppState {
            reconciler: Arc::new(h.reconciler),
        });
        let response = app
            .oneshot(request(
                "/hooks/jira/project/unknown/issue/10002",
                issue_body("jira:issue_created"),
                true,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("no integration configured"));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_return_422_on_malformed_json() {
        let h = harness();
        let app = router(AppState {
            reconciler: Arc::new(h.reconciler),
        });
        let uri = format!("/hooks/jira/project/{PROJECT}/issue/10002");
        let response = app
            .oneshot(request(&uri, "not-json".into(), true))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_reconcile_a_worklog_event() {
        let h = harness();
        let links = h.links.clone();
        let app = router(AppState {
            reconciler: Arc::new(h.reconciler),
        });
        let body = json!({
            "webhookEvent": "worklog_created",
            "worklog": {
                "author": { "accountId": AUTHOR },
                "comment": "pairing",
                "started": "2024-01-01T09:00:00.000+0000",
                "timeSpentSeconds": 9000,
            },
        })
        .to_string();
        let uri = format!("/hooks/jira/project/{PROJECT}/issue/10002/worklog/555");
        let response = app.oneshot(request(&uri, body, true)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(links.find_link(EntityKind::TimeEntry, "555").await.is_some());
    }
}
