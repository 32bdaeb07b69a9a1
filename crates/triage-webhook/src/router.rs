//! Maps decoded block actions onto issue side effects and Slack replies.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::action_token::IssueTarget;

/// Repository-dispatch event consumed by the planning workflow.
pub const PLAN_DISPATCH_EVENT: &str = "claude-plan";
/// Repository-dispatch event consumed by the implementation workflow.
pub const IMPLEMENT_DISPATCH_EVENT: &str = "claude-implement";

/// Recognized interactive action identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookAction {
    CreatePlan,
    Replan,
    ApproveImplementation,
    RejectImplementation,
}

impl WebhookAction {
    /// Parses a block action id; unrecognized ids stay unrouted and fall
    /// through to the bare acknowledgement.
    pub fn from_action_id(action_id: &str) -> Option<Self> {
        match action_id {
            "create_plan" => Some(Self::CreatePlan),
            "replan" => Some(Self::Replan),
            "approve_implementation" => Some(Self::ApproveImplementation),
            "reject_implementation" => Some(Self::RejectImplementation),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreatePlan => "create_plan",
            Self::Replan => "replan",
            Self::ApproveImplementation => "approve_implementation",
            Self::RejectImplementation => "reject_implementation",
        }
    }
}

/// Side effects the router can trigger against the issue tracker.
#[async_trait]
pub trait IssueWorkflowEffects: Send + Sync {
    /// Fires a repository-dispatch event for the issue's repository.
    async fn dispatch_workflow_event(&self, issue: &IssueTarget, event_type: &str) -> Result<()>;
    /// Adds a comment to the issue. Best-effort from the router's view.
    async fn add_issue_comment(&self, issue: &IssueTarget, body: &str) -> Result<()>;
    /// Closes the issue. Best-effort from the router's view.
    async fn close_issue(&self, issue: &IssueTarget) -> Result<()>;
}

/// Routes one decoded block action to its side effect.
///
/// Returns the replacement message Slack renders in place of the original
/// notification. `None` means the caller falls through to the bare
/// acknowledgement: a failed dispatch leaves the original message untouched.
/// Repeated clicks dispatch again; deduplication belongs to the automation
/// consumer.
pub async fn route_block_action(
    effects: &dyn IssueWorkflowEffects,
    issue: &IssueTarget,
    action: WebhookAction,
    user_name: &str,
) -> Option<Value> {
    match action {
        WebhookAction::CreatePlan => {
            dispatch_or_log(effects, issue, PLAN_DISPATCH_EVENT, action).await?;
            Some(render_replacement_message(
                &format!("📋 Creating a plan for issue #{}...", issue.number),
                &format!(
                    "📋 Plan creation for *issue #{}* was started by *{}*.\n\nYou will be notified when the plan is ready...",
                    issue.number, user_name
                ),
            ))
        }
        WebhookAction::Replan => {
            dispatch_or_log(effects, issue, PLAN_DISPATCH_EVENT, action).await?;
            Some(render_replacement_message(
                &format!("🔄 Re-planning issue #{}...", issue.number),
                &format!(
                    "🔄 Re-planning of *issue #{}* was started by *{}*.",
                    issue.number, user_name
                ),
            ))
        }
        WebhookAction::ApproveImplementation => {
            dispatch_or_log(effects, issue, IMPLEMENT_DISPATCH_EVENT, action).await?;
            Some(render_replacement_message(
                &format!("✅ Implementation started for issue #{}", issue.number),
                &format!(
                    "✅ Implementation of *issue #{}* was approved by *{}*.\n\nStarting the implementation workflow...",
                    issue.number, user_name
                ),
            ))
        }
        WebhookAction::RejectImplementation => {
            let comment = format!("## ❌ Rejected\n\nRejected via Slack by {user_name}.");
            if let Err(error) = effects.add_issue_comment(issue, &comment).await {
                eprintln!(
                    "rejection comment failed: repo={}/{} issue={} error={error}",
                    issue.owner, issue.repo, issue.number
                );
            }
            if let Err(error) = effects.close_issue(issue).await {
                eprintln!(
                    "issue close failed: repo={}/{} issue={} error={error}",
                    issue.owner, issue.repo, issue.number
                );
            }
            Some(render_replacement_message(
                &format!("❌ Issue #{} was rejected", issue.number),
                &format!(
                    "❌ *Issue #{}* was rejected by *{}*.\n\nThe issue has been closed.",
                    issue.number, user_name
                ),
            ))
        }
    }
}

async fn dispatch_or_log(
    effects: &dyn IssueWorkflowEffects,
    issue: &IssueTarget,
    event_type: &str,
    action: WebhookAction,
) -> Option<()> {
    match effects.dispatch_workflow_event(issue, event_type).await {
        Ok(()) => Some(()),
        Err(error) => {
            eprintln!(
                "workflow dispatch failed: action={} event_type={event_type} repo={}/{} issue={} error={error}",
                action.as_str(),
                issue.owner,
                issue.repo,
                issue.number
            );
            None
        }
    }
}

fn render_replacement_message(text: &str, detail: &str) -> Value {
    json!({
        "response_type": "in_channel",
        "replace_original": true,
        "text": text,
        "blocks": [
            {
                "type": "section",
                "text": { "type": "mrkdwn", "text": detail },
            }
        ],
    })
}
