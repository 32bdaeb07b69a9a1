//! Command-line and environment configuration for the triage server.

use clap::Parser;

use crate::server::TriageServerConfig;

#[derive(Debug, Parser)]
#[command(
    name = "triage-server",
    about = "Feedback triage bridge between GitHub issues and Slack approvals",
    version
)]
pub(crate) struct Cli {
    #[arg(
        long,
        default_value = "127.0.0.1:8080",
        help = "Socket address the HTTP server binds"
    )]
    pub(crate) bind: String,

    #[arg(
        long = "github-api-base",
        env = "GITHUB_API_BASE",
        default_value = "https://api.github.com",
        help = "Base URL for the GitHub REST API"
    )]
    pub(crate) github_api_base: String,

    #[arg(
        long = "slack-api-base",
        env = "SLACK_API_BASE",
        default_value = "https://slack.com/api",
        help = "Base URL for the Slack Web API"
    )]
    pub(crate) slack_api_base: String,

    #[arg(
        long = "request-timeout-ms",
        default_value_t = 10_000,
        help = "Timeout applied to outbound GitHub and Slack calls"
    )]
    pub(crate) request_timeout_ms: u64,

    #[arg(
        long = "github-token",
        env = "GITHUB_TOKEN",
        hide_env_values = true,
        help = "Token used for issue creation and workflow dispatch; intake degrades to CONFIG_ERROR when absent"
    )]
    pub(crate) github_token: Option<String>,

    #[arg(
        long = "github-repo-owner",
        env = "GITHUB_REPO_OWNER",
        help = "Default owner for created issues and action-token fallback"
    )]
    pub(crate) github_repo_owner: Option<String>,

    #[arg(
        long = "github-repo-name",
        env = "GITHUB_REPO_NAME",
        help = "Default repository for created issues and action-token fallback"
    )]
    pub(crate) github_repo_name: Option<String>,

    #[arg(
        long = "slack-bot-token",
        env = "SLACK_BOT_TOKEN",
        hide_env_values = true,
        help = "Bot token for posting notifications; notifications are skipped when absent"
    )]
    pub(crate) slack_bot_token: Option<String>,

    #[arg(
        long = "slack-channel-id",
        env = "SLACK_CHANNEL_ID",
        help = "Channel receiving feedback notifications"
    )]
    pub(crate) slack_channel_id: Option<String>,

    #[arg(
        long = "slack-signing-secret",
        env = "SLACK_SIGNING_SECRET",
        hide_env_values = true,
        help = "Secret verifying inbound webhook signatures; verification fails closed when absent"
    )]
    pub(crate) slack_signing_secret: Option<String>,
}

impl Cli {
    pub(crate) fn into_config(self) -> TriageServerConfig {
        TriageServerConfig {
            bind: self.bind,
            github_api_base: self.github_api_base,
            slack_api_base: self.slack_api_base,
            request_timeout_ms: self.request_timeout_ms,
            github_token: self.github_token.unwrap_or_default(),
            github_repo_owner: self.github_repo_owner.unwrap_or_default(),
            github_repo_name: self.github_repo_name.unwrap_or_default(),
            slack_bot_token: self.slack_bot_token.unwrap_or_default(),
            slack_channel_id: self.slack_channel_id.unwrap_or_default(),
            slack_signing_secret: self.slack_signing_secret.unwrap_or_default(),
        }
    }
}
