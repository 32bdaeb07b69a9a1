//! Inbound Slack interaction endpoint: verify, decode, route.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use triage_core::current_unix_timestamp;
use triage_webhook::{
    decode_interaction_payload, resolve_action_value, route_block_action, verify_slack_signature,
    WebhookAction, WebhookPayload,
};

use super::TriageServerState;

pub(super) const SLACK_SIGNATURE_HEADER: &str = "x-slack-signature";
pub(super) const SLACK_TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";

pub(super) async fn handle_slack_webhook(
    State(state): State<Arc<TriageServerState>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let signature = header_value(&headers, SLACK_SIGNATURE_HEADER);
    let timestamp = header_value(&headers, SLACK_TIMESTAMP_HEADER);

    if !verify_slack_signature(
        &signature,
        &timestamp,
        &body,
        &state.config.slack_signing_secret,
        current_unix_timestamp(),
    ) {
        return error_response(StatusCode::UNAUTHORIZED, "invalid signature");
    }

    let payload = match decode_interaction_payload(&body) {
        Ok(payload) => payload,
        Err(error) => return error_response(StatusCode::BAD_REQUEST, &error.to_string()),
    };

    match payload {
        WebhookPayload::UrlVerification { challenge } => {
            (StatusCode::OK, Json(json!({ "challenge": challenge }))).into_response()
        }
        WebhookPayload::Unrecognized { payload_type } => {
            println!("slack webhook acknowledged without effect: type={payload_type}");
            acknowledge()
        }
        WebhookPayload::BlockActions {
            action_id,
            action_value,
            user_name,
        } => {
            let Some(issue) = resolve_action_value(
                &action_value,
                &state.config.github_repo_owner,
                &state.config.github_repo_name,
            ) else {
                return error_response(StatusCode::BAD_REQUEST, "invalid action value");
            };

            let Some(action) = WebhookAction::from_action_id(&action_id) else {
                println!(
                    "slack webhook acknowledged without effect: action_id={action_id} issue={}",
                    issue.number
                );
                return acknowledge();
            };

            println!(
                "slack webhook action received: action={} repo={}/{} issue={} user={}",
                action.as_str(),
                issue.owner,
                issue.repo,
                issue.number,
                user_name
            );
            match route_block_action(&state.github, &issue, action, &user_name).await {
                Some(reply) => (StatusCode::OK, Json(reply)).into_response(),
                None => acknowledge(),
            }
        }
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn acknowledge() -> Response {
    (StatusCode::OK, Json(json!({ "ok": true }))).into_response()
}
