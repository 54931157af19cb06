use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;
use tracing::{error, info};

use crate::normalize;
use crate::shell::http::{ack, fail};
use crate::shell::state::AppState;

/// Clockify carries the event type in a header, not the body.
const EVENT_TYPE_HEADER: &str = "clockify-webhook-event-type";

pub async fn handle(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Some(event_type) = headers
        .get(EVENT_TYPE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
    else {
        return fail("missing clockify-webhook-event-type header");
    };
    let Json(body) = match body {
        Ok(body) => body,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };

    info!(event_type, "clockify webhook received");

    let inbound = match normalize::clockify::event(&event_type, body) {
        Ok(inbound) => inbound,
        Err(error) => return fail(error.to_string()),
    };
    match state.reconciler.handle(inbound).await {
        Ok(()) => ack(),
        Err(error) => {
            error!(%error, event_type, "clockify reconciliation failed");
            fail(error.to_string())
        }
    }
}
