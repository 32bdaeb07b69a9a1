//! Codec for the `owner/repo|issueNumber` token embedded in action buttons.
//!
//! The token is the only channel carrying issue identity across the human
//! interaction round trip; Slack returns it unmodified in the button value.

/// Resolved identity of a tracked issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueTarget {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

/// Encodes issue identity into a button value.
pub fn encode_action_value(owner: &str, repo: &str, issue_number: u64) -> String {
    format!("{owner}/{repo}|{issue_number}")
}

/// Parses a button value back into an [`IssueTarget`].
///
/// The owner and repo halves fall back independently to the configured
/// defaults when empty. Returns `None` for malformed tokens: extra `|`
/// segments, an owner segment with more than one `/`, a non-numeric or
/// non-positive issue number, or an owner/repo that is still empty after
/// fallback.
pub fn resolve_action_value(
    value: &str,
    default_owner: &str,
    default_repo: &str,
) -> Option<IssueTarget> {
    let mut segments = value.split('|');
    let repo_segment = segments.next()?;
    let number_segment = segments.next()?;
    if segments.next().is_some() {
        return None;
    }

    let (owner_part, repo_part) = match repo_segment.split_once('/') {
        Some((owner, repo)) => {
            if repo.contains('/') {
                return None;
            }
            (owner, repo)
        }
        None => (repo_segment, ""),
    };

    let owner = first_non_empty(owner_part, default_owner)?;
    let repo = first_non_empty(repo_part, default_repo)?;
    let number = number_segment.trim().parse::<u64>().ok()?;
    if number == 0 {
        return None;
    }

    Some(IssueTarget {
        owner,
        repo,
        number,
    })
}

fn first_non_empty(value: &str, fallback: &str) -> Option<String> {
    let chosen = if value.trim().is_empty() {
        fallback.trim()
    } else {
        value.trim()
    };
    if chosen.is_empty() {
        return None;
    }
    Some(chosen.to_string())
}
