//! Webhook error types for gateway notification handling.
//!
//! Defines the error conditions that can occur while verifying and routing
//! inbound notifications, with HTTP status code mapping and retryability
//! semantics for the webhook endpoint.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that occur during webhook processing.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The signature header was absent or empty.
    ///
    /// Rejected before any JSON parsing is attempted.
    #[error("Missing signature header")]
    MissingSignature,

    /// The recomputed digest did not match the header value.
    #[error("Invalid signature")]
    SignatureMismatch,

    /// Failed to parse the notification body or a required envelope field
    /// was missing. Verification fails closed on these.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl WebhookError {
    /// Returns true if the gateway should retry delivering this webhook.
    ///
    /// All current variants are caller-side rejections that will not
    /// succeed on redelivery of the same payload.
    pub fn is_retryable(&self) -> bool {
        false
    }

    /// Maps the error to an appropriate HTTP status code.
    ///
    /// Status codes determine the gateway's retry behavior:
    /// - 2xx: Event acknowledged, no retry
    /// - 4xx: Client error, no retry
    /// - 5xx: Server error, will retry
    pub fn status_code(&self) -> StatusCode {
        match self {
            // Auth failures - don't retry
            WebhookError::MissingSignature | WebhookError::SignatureMismatch => {
                StatusCode::UNAUTHORIZED
            }

            // Bad request - don't retry
            WebhookError::Parse(_) => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ══════════════════════════════════════════════════════════════
    // Error Display Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn missing_signature_displays_correctly() {
        let err = WebhookError::MissingSignature;
        assert_eq!(format!("{}", err), "Missing signature header");
    }

    #[test]
    fn signature_mismatch_displays_correctly() {
        let err = WebhookError::SignatureMismatch;
        assert_eq!(format!("{}", err), "Invalid signature");
    }

    #[test]
    fn parse_error_displays_message() {
        let err = WebhookError::Parse("invalid JSON".to_string());
        assert_eq!(format!("{}", err), "Parse error: invalid JSON");
    }

    // ══════════════════════════════════════════════════════════════
    // Retryability and Status Code Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn no_webhook_error_is_retryable() {
        assert!(!WebhookError::MissingSignature.is_retryable());
        assert!(!WebhookError::SignatureMismatch.is_retryable());
        assert!(!WebhookError::Parse("bad json".to_string()).is_retryable());
    }

    #[test]
    fn signature_failures_return_unauthorized() {
        assert_eq!(
            WebhookError::MissingSignature.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            WebhookError::SignatureMismatch.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn parse_error_returns_bad_request() {
        let err = WebhookError::Parse("syntax error".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
