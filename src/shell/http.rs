use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;

use crate::shell::state::AppState;
use crate::shell::{clockify, jira};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/hooks/jira/project/{project_id}/issue/{issue_id}",
            post(jira::handle_issue),
        )
        .route(
            "/hooks/jira/project/{project_id}/issue/{issue_id}/worklog/{worklog_id}",
            post(jira::handle_worklog),
        )
        .route("/hooks/clockify", post(clockify::handle))
        .with_state(state)
}

pub(crate) fn ack() -> Response {
    (StatusCode::OK, Json(json!({ "message": "Success" }))).into_response()
}

pub(crate) fn fail(message: impl Into<String>) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": message.into() })),
    )
        .into_response()
}
