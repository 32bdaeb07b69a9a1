//! Slack request signature verification.

use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Maximum accepted distance between a request timestamp and the local clock.
pub const SIGNATURE_FRESHNESS_WINDOW_SECONDS: u64 = 300;

/// Verifies the `v0` Slack signature over the raw request body.
///
/// Fails closed: a missing signing secret, an unparseable or stale
/// timestamp, and a malformed signature all return `false`. The digest
/// comparison goes through [`Mac::verify_slice`], a fixed-time primitive
/// that tolerates length mismatches without panicking.
pub fn verify_slack_signature(
    signature: &str,
    timestamp: &str,
    raw_body: &str,
    signing_secret: &str,
    now_unix: u64,
) -> bool {
    let signing_secret = signing_secret.trim();
    if signing_secret.is_empty() {
        return false;
    }

    let Ok(timestamp_seconds) = timestamp.trim().parse::<u64>() else {
        return false;
    };
    if now_unix.abs_diff(timestamp_seconds) > SIGNATURE_FRESHNESS_WINDOW_SECONDS {
        return false;
    }

    let Some(digest_hex) = signature.strip_prefix("v0=") else {
        return false;
    };
    let Some(signature_bytes) = decode_hex(digest_hex) else {
        return false;
    };

    let signed_payload = format!("v0:{timestamp}:{raw_body}");
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(signing_secret.as_bytes()) else {
        return false;
    };
    mac.update(signed_payload.as_bytes());
    mac.verify_slice(&signature_bytes).is_ok()
}

fn decode_hex(value: &str) -> Option<Vec<u8>> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.len() % 2 != 0 {
        return None;
    }

    let raw = trimmed.as_bytes();
    let mut bytes = Vec::with_capacity(raw.len() / 2);
    let mut index = 0usize;
    while index < raw.len() {
        let hex = std::str::from_utf8(&raw[index..index + 2]).ok()?;
        bytes.push(u8::from_str_radix(hex, 16).ok()?);
        index = index.saturating_add(2);
    }
    Some(bytes)
}
