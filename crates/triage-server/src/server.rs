//! Axum server wiring the intake and webhook endpoints.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::post;
use axum::Router;
use tokio::net::TcpListener;
use triage_github::GithubApiClient;
use triage_slack::SlackApiClient;

mod api_error;
mod intake;
mod slack_webhook;

use intake::handle_feedback_submit;
use slack_webhook::handle_slack_webhook;

pub const FEEDBACK_ENDPOINT: &str = "/api/v1/feedback";
pub const SLACK_WEBHOOK_ENDPOINT: &str = "/api/v1/webhooks/slack";

/// Immutable process-wide configuration, loaded once at startup and passed
/// explicitly into the server state.
#[derive(Debug, Clone)]
pub struct TriageServerConfig {
    pub bind: String,
    pub github_api_base: String,
    pub slack_api_base: String,
    pub request_timeout_ms: u64,
    pub github_token: String,
    pub github_repo_owner: String,
    pub github_repo_name: String,
    pub slack_bot_token: String,
    pub slack_channel_id: String,
    pub slack_signing_secret: String,
}

pub struct TriageServerState {
    pub config: TriageServerConfig,
    pub github: GithubApiClient,
    pub slack: SlackApiClient,
}

impl TriageServerState {
    /// Builds the shared state, constructing both API clients once. Missing
    /// credentials do not fail here: intake degrades to a config error and
    /// signature verification fails closed.
    pub fn new(config: TriageServerConfig) -> Result<Self> {
        let github = GithubApiClient::new(
            config.github_api_base.clone(),
            config.github_token.clone(),
            config.request_timeout_ms,
        )?;
        let slack = SlackApiClient::new(
            config.slack_api_base.clone(),
            config.slack_bot_token.clone(),
            config.request_timeout_ms,
        )?;
        Ok(Self {
            config,
            github,
            slack,
        })
    }
}

pub fn build_triage_router(state: Arc<TriageServerState>) -> Router {
    Router::new()
        .route(FEEDBACK_ENDPOINT, post(handle_feedback_submit))
        .route(SLACK_WEBHOOK_ENDPOINT, post(handle_slack_webhook))
        .with_state(state)
}

pub async fn run_triage_server(config: TriageServerConfig) -> Result<()> {
    let bind_addr = config
        .bind
        .parse::<SocketAddr>()
        .with_context(|| format!("invalid --bind '{}'", config.bind))?;
    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind triage server on {bind_addr}"))?;
    let local_addr = listener
        .local_addr()
        .context("failed to resolve bound triage server address")?;

    let state = Arc::new(TriageServerState::new(config)?);
    println!(
        "feedback triage server listening: addr={local_addr} intake={FEEDBACK_ENDPOINT} webhook={SLACK_WEBHOOK_ENDPOINT}"
    );

    let app = build_triage_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("triage server exited unexpectedly")?;
    Ok(())
}
