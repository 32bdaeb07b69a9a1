//! Feedback intake endpoint: validation, issue creation, notification.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use triage_github::GithubCreatedIssue;
use triage_slack::{render_feedback_notification, FeedbackNotification};

use super::api_error::IntakeApiError;
use super::TriageServerState;

/// Feedback categories accepted on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FeedbackCategory {
    Bug,
    Feature,
    Question,
    Other,
}

impl FeedbackCategory {
    const WIRE_VALUES: &'static str = "bug, feature, question, other";

    pub(crate) fn from_wire(value: &str) -> Option<Self> {
        match value {
            "bug" => Some(Self::Bug),
            "feature" => Some(Self::Feature),
            "question" => Some(Self::Question),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    /// Label applied to the created issue alongside `user-feedback`.
    pub(crate) fn issue_label(&self) -> &'static str {
        match self {
            Self::Bug => "bug",
            Self::Feature => "enhancement",
            Self::Question => "question",
            Self::Other => "other",
        }
    }

    /// Human-facing label shown in the notification.
    pub(crate) fn display_label(&self) -> &'static str {
        match self {
            Self::Bug => "Bug report",
            Self::Feature => "Feature request",
            Self::Question => "Question",
            Self::Other => "Other",
        }
    }
}

/// A validated feedback submission; immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FeedbackSubmission {
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) category: FeedbackCategory,
}

pub(crate) fn validate_submission(body: &Value) -> Result<FeedbackSubmission, IntakeApiError> {
    if !body.is_object() {
        return Err(IntakeApiError::validation(
            "request body must be a JSON object",
        ));
    }

    let title = body
        .get("title")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| IntakeApiError::validation("title is required"))?;
    let description = body
        .get("description")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| IntakeApiError::validation("description is required"))?;

    let category = match body.get("category") {
        None => FeedbackCategory::Other,
        Some(value) => value
            .as_str()
            .and_then(FeedbackCategory::from_wire)
            .ok_or_else(|| {
                IntakeApiError::validation(format!(
                    "category must be one of: {}",
                    FeedbackCategory::WIRE_VALUES
                ))
            })?,
    };

    Ok(FeedbackSubmission {
        title: title.to_string(),
        description: description.to_string(),
        category,
    })
}

pub(super) async fn handle_feedback_submit(
    State(state): State<Arc<TriageServerState>>,
    body: String,
) -> Response {
    let parsed: Value = match serde_json::from_str(&body) {
        Ok(value) => value,
        Err(_) => return IntakeApiError::invalid_json().into_response(),
    };
    let submission = match validate_submission(&parsed) {
        Ok(submission) => submission,
        Err(error) => return error.into_response(),
    };

    let config = &state.config;
    if config.github_token.trim().is_empty()
        || config.github_repo_owner.trim().is_empty()
        || config.github_repo_name.trim().is_empty()
    {
        return IntakeApiError::config("github tracker is not configured").into_response();
    }

    let labels = vec![
        "user-feedback".to_string(),
        submission.category.issue_label().to_string(),
    ];
    let created = match state
        .github
        .create_issue(
            &config.github_repo_owner,
            &config.github_repo_name,
            &submission.title,
            &submission.description,
            &labels,
        )
        .await
    {
        Ok(created) => created,
        Err(error) => {
            eprintln!("feedback issue creation failed: error={error}");
            return IntakeApiError::internal().into_response();
        }
    };
    println!(
        "feedback issue created: repo={}/{} issue={} category={}",
        config.github_repo_owner,
        config.github_repo_name,
        created.number,
        submission.category.issue_label()
    );

    notify_feedback_channel(&state, &submission, &created).await;

    (
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "issueNumber": created.number,
            "issueUrl": created.html_url,
        })),
    )
        .into_response()
}

/// Posts the channel notification. A courtesy: failures are logged and never
/// change the submission outcome.
async fn notify_feedback_channel(
    state: &TriageServerState,
    submission: &FeedbackSubmission,
    created: &GithubCreatedIssue,
) {
    let config = &state.config;
    if config.slack_bot_token.trim().is_empty() || config.slack_channel_id.trim().is_empty() {
        println!(
            "slack notification skipped: reason=missing_credentials issue={}",
            created.number
        );
        return;
    }

    let notification = FeedbackNotification {
        issue_number: created.number,
        issue_url: created.html_url.clone(),
        title: submission.title.clone(),
        description: submission.description.clone(),
        category_label: submission.category.display_label().to_string(),
        owner: config.github_repo_owner.clone(),
        repo: config.github_repo_name.clone(),
    };
    let (text, blocks) = render_feedback_notification(&notification);
    if let Err(error) = state
        .slack
        .post_message(&config.slack_channel_id, &text, &blocks)
        .await
    {
        eprintln!(
            "slack notification failed: issue={} error={error}",
            created.number
        );
    }
}
