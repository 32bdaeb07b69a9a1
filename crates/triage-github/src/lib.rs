//! GitHub REST v3 client for the feedback triage workflow.

pub mod github_client;

pub use github_client::{GithubApiClient, GithubCreatedIssue, GITHUB_API_BASE};
