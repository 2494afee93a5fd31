//! Request/response DTOs for the payment webhook endpoint.

use serde::{Deserialize, Serialize};

use crate::domain::payment::WebhookAction;

/// Response body for an accepted webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookResponse {
    /// Normalized action derived from the event.
    pub action: WebhookAction,

    /// Transaction id the outcome was applied to, when one existed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable machine-readable error code.
    pub error: String,

    /// Human-readable message.
    pub message: String,
}
