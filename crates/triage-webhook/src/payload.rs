//! Decodes the Slack interaction transport envelope.
//!
//! The transport body is `application/x-www-form-urlencoded` with the
//! interaction JSON carried in a single `payload` field. Two shapes are
//! recognized: the endpoint-ownership handshake and block-action clicks;
//! anything else decodes into an acknowledged no-op.

use serde::Deserialize;
use thiserror::Error;

/// Enumerates decode failures on the webhook transport envelope.
#[derive(Debug, Error)]
pub enum WebhookDecodeError {
    #[error("missing payload field")]
    MissingPayload,
    #[error("invalid payload json: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("no action found")]
    MissingAction,
    #[error("missing action value")]
    MissingActionValue,
}

/// One decoded inbound interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookPayload {
    /// Endpoint ownership handshake; the challenge is echoed verbatim.
    UrlVerification { challenge: String },
    /// A button click carrying an action id, its token value, and the actor.
    BlockActions {
        action_id: String,
        action_value: String,
        user_name: String,
    },
    /// Any other interaction type; acknowledged without side effects.
    Unrecognized { payload_type: String },
}

#[derive(Debug, Deserialize)]
struct InteractionEnvelope {
    #[serde(rename = "type")]
    payload_type: String,
    #[serde(default)]
    challenge: Option<String>,
    #[serde(default)]
    actions: Vec<InteractionAction>,
    #[serde(default)]
    user: Option<InteractionUser>,
}

#[derive(Debug, Deserialize)]
struct InteractionAction {
    #[serde(default)]
    action_id: String,
    #[serde(default)]
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InteractionUser {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    username: Option<String>,
}

/// Extracts the `payload` form field from the raw body and parses it.
pub fn decode_interaction_payload(raw_body: &str) -> Result<WebhookPayload, WebhookDecodeError> {
    let payload_json = extract_payload_field(raw_body).ok_or(WebhookDecodeError::MissingPayload)?;
    let envelope: InteractionEnvelope = serde_json::from_str(&payload_json)?;

    match envelope.payload_type.as_str() {
        "url_verification" => Ok(WebhookPayload::UrlVerification {
            challenge: envelope.challenge.unwrap_or_default(),
        }),
        "block_actions" => {
            let action = envelope
                .actions
                .into_iter()
                .next()
                .ok_or(WebhookDecodeError::MissingAction)?;
            let action_value = action.value.ok_or(WebhookDecodeError::MissingActionValue)?;
            Ok(WebhookPayload::BlockActions {
                action_id: action.action_id,
                action_value,
                user_name: resolve_user_name(envelope.user.as_ref()),
            })
        }
        _ => Ok(WebhookPayload::Unrecognized {
            payload_type: envelope.payload_type,
        }),
    }
}

fn extract_payload_field(raw_body: &str) -> Option<String> {
    for pair in raw_body.split('&') {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if key != "payload" {
            continue;
        }
        let replaced = value.replace('+', " ");
        let decoded = urlencoding::decode(&replaced).ok()?;
        return Some(decoded.into_owned());
    }
    None
}

fn resolve_user_name(user: Option<&InteractionUser>) -> String {
    user.and_then(|user| {
        user.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .or_else(|| {
                user.username
                    .as_deref()
                    .filter(|name| !name.trim().is_empty())
            })
            .map(str::to_string)
    })
    .unwrap_or_else(|| "Unknown".to_string())
}
