//! End-to-end round trip: the token embedded in a rendered notification is
//! decoded from a signed interaction callback and routed into tracker
//! side effects.

use hmac::{Hmac, Mac};
use httpmock::prelude::*;
use serde_json::json;
use sha2::Sha256;
use triage_github::GithubApiClient;
use triage_slack::{render_feedback_notification, FeedbackNotification};
use triage_webhook::{
    decode_interaction_payload, resolve_action_value, route_block_action, verify_slack_signature,
    WebhookAction, WebhookPayload,
};

fn slack_v0_signature(secret: &str, timestamp: &str, payload: &str) -> String {
    let signed = format!("v0:{timestamp}:{payload}");
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("mac");
    mac.update(signed.as_bytes());
    let digest = mac.finalize().into_bytes();
    format!(
        "v0={}",
        digest
            .iter()
            .map(|byte| format!("{byte:02x}"))
            .collect::<String>()
    )
}

fn rendered_button_value(element_index: usize) -> (String, String) {
    let notification = FeedbackNotification {
        issue_number: 42,
        issue_url: "https://github.com/acme/widgets/issues/42".to_string(),
        title: "Login broken".to_string(),
        description: "Cannot sign in".to_string(),
        category_label: "Bug report".to_string(),
        owner: "acme".to_string(),
        repo: "widgets".to_string(),
    };
    let (_, blocks) = render_feedback_notification(&notification);
    let element = &blocks[6]["elements"][element_index];
    (
        element["action_id"].as_str().expect("action_id").to_string(),
        element["value"].as_str().expect("button value").to_string(),
    )
}

fn interaction_body(action_id: &str, value: &str, user: &str) -> String {
    let payload_json = json!({
        "type": "block_actions",
        "user": { "name": user },
        "actions": [{ "action_id": action_id, "value": value }],
    })
    .to_string();
    format!("payload={}", urlencoding::encode(&payload_json))
}

#[tokio::test]
async fn notification_token_round_trips_into_plan_dispatch() {
    let github = MockServer::start();
    let dispatch_mock = github.mock(|when, then| {
        when.method(POST)
            .path("/repos/acme/widgets/dispatches")
            .json_body(json!({
                "event_type": "claude-plan",
                "client_payload": { "issue_number": 42 },
            }));
        then.status(204);
    });

    let (action_id, button_value) = rendered_button_value(0);
    let body = interaction_body(&action_id, &button_value, "jane");

    let timestamp = "1700000000";
    let signature = slack_v0_signature("shhh", timestamp, &body);
    assert!(verify_slack_signature(
        &signature,
        timestamp,
        &body,
        "shhh",
        1_700_000_000
    ));

    let decoded = decode_interaction_payload(&body).expect("decode");
    let WebhookPayload::BlockActions {
        action_id,
        action_value,
        user_name,
    } = decoded
    else {
        panic!("expected block actions");
    };
    assert_eq!(user_name, "jane");

    let issue = resolve_action_value(&action_value, "", "").expect("resolve token");
    assert_eq!(issue.number, 42);
    let action = WebhookAction::from_action_id(&action_id).expect("known action");

    let client =
        GithubApiClient::new(github.base_url(), "ghp-test".to_string(), 2_000).expect("client");
    let reply = route_block_action(&client, &issue, action, &user_name)
        .await
        .expect("replacement message");

    assert_eq!(reply["replace_original"], true);
    dispatch_mock.assert();
}

#[tokio::test]
async fn notification_reject_button_round_trips_into_comment_and_close() {
    let github = MockServer::start();
    let comment_mock = github.mock(|when, then| {
        when.method(POST).path("/repos/acme/widgets/issues/42/comments");
        then.status(201).json_body(json!({ "id": 1 }));
    });
    let close_mock = github.mock(|when, then| {
        when.method(PATCH)
            .path("/repos/acme/widgets/issues/42")
            .json_body(json!({ "state": "closed" }));
        then.status(200).json_body(json!({ "number": 42 }));
    });

    let (action_id, button_value) = rendered_button_value(1);
    assert_eq!(action_id, "reject_implementation");
    let body = interaction_body(&action_id, &button_value, "jane");

    let decoded = decode_interaction_payload(&body).expect("decode");
    let WebhookPayload::BlockActions {
        action_id,
        action_value,
        user_name,
    } = decoded
    else {
        panic!("expected block actions");
    };

    let issue = resolve_action_value(&action_value, "", "").expect("resolve token");
    let action = WebhookAction::from_action_id(&action_id).expect("known action");
    let client =
        GithubApiClient::new(github.base_url(), "ghp-test".to_string(), 2_000).expect("client");
    let reply = route_block_action(&client, &issue, action, &user_name)
        .await
        .expect("replacement message");

    let text = reply["text"].as_str().expect("text");
    assert!(text.contains("42"));
    assert!(text.contains("rejected"));
    comment_mock.assert();
    close_mock.assert();
}
