//! GitHub API client used by issue intake and the webhook effect executors.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use triage_core::truncate_for_error;
use triage_webhook::{IssueTarget, IssueWorkflowEffects};

/// Default REST endpoint; overridable for tests and GitHub Enterprise.
pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Issue identity returned by issue creation.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubCreatedIssue {
    pub number: u64,
    pub html_url: String,
}

#[derive(Clone)]
pub struct GithubApiClient {
    http: reqwest::Client,
    api_base: String,
}

impl GithubApiClient {
    pub fn new(api_base: String, token: String, request_timeout_ms: u64) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("triage-feedback-bridge"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            reqwest::header::HeaderValue::from_static("2022-11-28"),
        );
        let auth_header = format!("Bearer {}", token.trim());
        headers.insert(
            reqwest::header::AUTHORIZATION,
            reqwest::header::HeaderValue::from_str(&auth_header)
                .context("invalid github authorization header")?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(request_timeout_ms.max(1)))
            .build()
            .context("failed to create github api client")?;
        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Creates the tracked issue for a feedback submission. Load-bearing:
    /// errors propagate to the intake caller.
    pub async fn create_issue(
        &self,
        owner: &str,
        repo: &str,
        title: &str,
        body: &str,
        labels: &[String],
    ) -> Result<GithubCreatedIssue> {
        let payload = json!({
            "title": title,
            "body": body,
            "labels": labels,
        });
        self.request_json(
            "create issue",
            self.http
                .post(format!("{}/repos/{owner}/{repo}/issues", self.api_base))
                .json(&payload),
        )
        .await
    }

    pub async fn create_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
        body: &str,
    ) -> Result<()> {
        let payload = json!({ "body": body });
        self.request_unit(
            "create issue comment",
            self.http
                .post(format!(
                    "{}/repos/{owner}/{repo}/issues/{issue_number}/comments",
                    self.api_base
                ))
                .json(&payload),
        )
        .await
    }

    pub async fn close_issue(&self, owner: &str, repo: &str, issue_number: u64) -> Result<()> {
        let payload = json!({ "state": "closed" });
        self.request_unit(
            "close issue",
            self.http
                .patch(format!(
                    "{}/repos/{owner}/{repo}/issues/{issue_number}",
                    self.api_base
                ))
                .json(&payload),
        )
        .await
    }

    /// Fires a repository-dispatch event carrying the issue number. The
    /// automation consumer on the other side owns deduplication.
    pub async fn repository_dispatch(
        &self,
        owner: &str,
        repo: &str,
        event_type: &str,
        issue_number: u64,
    ) -> Result<()> {
        let payload = json!({
            "event_type": event_type,
            "client_payload": { "issue_number": issue_number },
        });
        self.request_unit(
            "repository dispatch",
            self.http
                .post(format!("{}/repos/{owner}/{repo}/dispatches", self.api_base))
                .json(&payload),
        )
        .await
    }

    async fn request_json<T>(&self, operation: &str, request: reqwest::RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self
            .send_checked(operation, request)
            .await?
            .json::<T>()
            .await
            .with_context(|| format!("failed to decode github {operation}"))?;
        Ok(response)
    }

    async fn request_unit(&self, operation: &str, request: reqwest::RequestBuilder) -> Result<()> {
        self.send_checked(operation, request).await.map(|_| ())
    }

    async fn send_checked(
        &self,
        operation: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response> {
        let response = request
            .send()
            .await
            .with_context(|| format!("github api {operation} request failed"))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!(
                "github api {operation} failed with status {}: {}",
                status.as_u16(),
                truncate_for_error(&body, 800)
            );
        }
        tracing::debug!(operation, status = status.as_u16(), "github api call ok");
        Ok(response)
    }
}

#[async_trait]
impl IssueWorkflowEffects for GithubApiClient {
    async fn dispatch_workflow_event(&self, issue: &IssueTarget, event_type: &str) -> Result<()> {
        self.repository_dispatch(&issue.owner, &issue.repo, event_type, issue.number)
            .await
    }

    async fn add_issue_comment(&self, issue: &IssueTarget, body: &str) -> Result<()> {
        self.create_issue_comment(&issue.owner, &issue.repo, issue.number, body)
            .await
    }

    async fn close_issue(&self, issue: &IssueTarget) -> Result<()> {
        GithubApiClient::close_issue(self, &issue.owner, &issue.repo, issue.number).await
    }
}
