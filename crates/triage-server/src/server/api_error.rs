//! Intake endpoint error envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Error payload mapped to the intake `{success, error, code}` envelope.
#[derive(Debug)]
pub(crate) struct IntakeApiError {
    pub(crate) status: StatusCode,
    pub(crate) code: &'static str,
    pub(crate) message: String,
}

impl IntakeApiError {
    pub(crate) fn invalid_json() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "INVALID_JSON",
            message: "invalid JSON".to_string(),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "VALIDATION_ERROR",
            message: message.into(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "CONFIG_ERROR",
            message: message.into(),
        }
    }

    /// Generic failure shown to submitters; the underlying error stays in
    /// the server log.
    pub(crate) fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "INTERNAL_ERROR",
            message: "failed to submit feedback".to_string(),
        }
    }
}

impl IntoResponse for IntakeApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({
                "success": false,
                "error": self.message,
                "code": self.code,
            })),
        )
            .into_response()
    }
}
