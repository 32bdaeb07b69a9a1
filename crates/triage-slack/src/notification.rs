//! Block Kit rendering for the feedback notification message.

use serde_json::{json, Value};
use triage_core::truncate_with_ellipsis;
use triage_webhook::{encode_action_value, WebhookAction};

/// Longest description excerpt shown in the notification.
pub const DESCRIPTION_EXCERPT_MAX_CHARS: usize = 500;

/// Everything needed to render one feedback notification.
#[derive(Debug, Clone)]
pub struct FeedbackNotification {
    pub issue_number: u64,
    pub issue_url: String,
    pub title: String,
    pub description: String,
    pub category_label: String,
    pub owner: String,
    pub repo: String,
}

/// Renders the notification fallback text and blocks. Both workflow buttons
/// carry the issue action token; the link button carries the issue URL.
pub fn render_feedback_notification(notification: &FeedbackNotification) -> (String, Value) {
    let action_value = encode_action_value(
        &notification.owner,
        &notification.repo,
        notification.issue_number,
    );
    let text = format!("New feedback: {}", notification.title);
    let description = truncate_with_ellipsis(&notification.description, DESCRIPTION_EXCERPT_MAX_CHARS);
    let blocks = json!([
        {
            "type": "header",
            "text": { "type": "plain_text", "text": "📝 New feedback", "emoji": true },
        },
        {
            "type": "section",
            "fields": [
                {
                    "type": "mrkdwn",
                    "text": format!("*Category:*\n{}", notification.category_label),
                },
                {
                    "type": "mrkdwn",
                    "text": format!(
                        "*Issue:*\n<{}|#{}>",
                        notification.issue_url, notification.issue_number
                    ),
                },
            ],
        },
        {
            "type": "section",
            "text": { "type": "mrkdwn", "text": format!("*Title:*\n{}", notification.title) },
        },
        {
            "type": "section",
            "text": { "type": "mrkdwn", "text": format!("*Description:*\n{description}") },
        },
        { "type": "divider" },
        {
            "type": "section",
            "text": { "type": "mrkdwn", "text": "*Create an implementation plan for this feedback?*" },
        },
        {
            "type": "actions",
            "elements": [
                {
                    "type": "button",
                    "text": { "type": "plain_text", "text": "📋 Create plan", "emoji": true },
                    "style": "primary",
                    "action_id": WebhookAction::CreatePlan.as_str(),
                    "value": action_value,
                },
                {
                    "type": "button",
                    "text": { "type": "plain_text", "text": "❌ Reject", "emoji": true },
                    "style": "danger",
                    "action_id": WebhookAction::RejectImplementation.as_str(),
                    "value": action_value,
                },
                {
                    "type": "button",
                    "text": { "type": "plain_text", "text": "View on GitHub", "emoji": true },
                    "url": notification.issue_url,
                },
            ],
        },
    ]);
    (text, blocks)
}
