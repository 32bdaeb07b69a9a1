//! Slack Web API client used to post channel notifications.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::{json, Value};
use triage_core::truncate_for_error;

/// Default Web API endpoint; overridable for tests.
pub const SLACK_API_BASE: &str = "https://slack.com/api";

#[derive(Debug, Clone, Deserialize)]
struct SlackChatMessageResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Clone)]
pub struct SlackApiClient {
    http: reqwest::Client,
    api_base: String,
    bot_token: String,
}

impl SlackApiClient {
    pub fn new(api_base: String, bot_token: String, request_timeout_ms: u64) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("triage-feedback-bridge"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(request_timeout_ms.max(1)))
            .build()
            .context("failed to create slack api client")?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            bot_token: bot_token.trim().to_string(),
        })
    }

    /// Posts a Block Kit message to a channel. A transport-level success with
    /// `ok: false` in the body is still a failure and names the Slack error.
    pub async fn post_message(&self, channel: &str, text: &str, blocks: &Value) -> Result<()> {
        let payload = json!({
            "channel": channel,
            "text": text,
            "blocks": blocks,
        });
        let response = self
            .http
            .post(format!("{}/chat.postMessage", self.api_base))
            .bearer_auth(&self.bot_token)
            .json(&payload)
            .send()
            .await
            .context("slack api chat.postMessage request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!(
                "slack api chat.postMessage failed with status {}: {}",
                status.as_u16(),
                truncate_for_error(&body, 800)
            );
        }

        let parsed: SlackChatMessageResponse = response
            .json()
            .await
            .context("failed to decode slack chat.postMessage")?;
        if !parsed.ok {
            bail!(
                "slack chat.postMessage failed: {}",
                parsed.error.unwrap_or_else(|| "unknown error".to_string())
            );
        }
        tracing::debug!(channel, "slack notification posted");
        Ok(())
    }
}
