//! HTTP handlers for payment webhook endpoints.
//!
//! These handlers connect Axum routes to the application layer. The
//! webhook endpoint takes the raw body byte-exact - signature verification
//! runs over the bytes as sent, so no extractor may re-encode them.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json};

use crate::application::handlers::payment::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, HandlePaymentWebhookResult,
    WebhookHandlingError,
};
use crate::domain::payment::WEBHOOK_SIGNATURE_HEADER;
use crate::ports::{CommerceCore, PaymentProvider};

use super::dto::{ErrorResponse, WebhookResponse};

/// Shared application state containing all dependencies.
#[derive(Clone)]
pub struct PaymentAppState {
    pub payment_provider: Arc<dyn PaymentProvider>,
    pub commerce_core: Arc<dyn CommerceCore>,
}

impl PaymentAppState {
    /// Create handlers on demand from the shared state.
    pub fn webhook_handler(&self) -> HandlePaymentWebhookHandler {
        HandlePaymentWebhookHandler::new(
            self.payment_provider.clone(),
            self.commerce_core.clone(),
        )
    }
}

/// Handle an inbound gateway notification.
///
/// The signature header is passed through as-is; its absence is decided by
/// the verifier (permissive mode accepts unsigned events), not here.
pub async fn handle_payment_webhook(
    State(state): State<PaymentAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, PaymentApiError> {
    let signature = headers
        .get(WEBHOOK_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);

    let handler = state.webhook_handler();
    let cmd = HandlePaymentWebhookCommand {
        payload: body.to_vec(),
        signature,
    };

    let result = handler.handle(cmd).await?;

    let response = match result {
        HandlePaymentWebhookResult::Applied {
            transaction_id,
            action,
        } => WebhookResponse {
            action,
            transaction_id: Some(transaction_id),
        },
        HandlePaymentWebhookResult::Acknowledged { action } => WebhookResponse {
            action,
            transaction_id: None,
        },
    };

    Ok((StatusCode::OK, Json(response)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts processing errors to HTTP responses.
pub struct PaymentApiError(WebhookHandlingError);

impl From<WebhookHandlingError> for PaymentApiError {
    fn from(err: WebhookHandlingError) -> Self {
        Self(err)
    }
}

impl IntoResponse for PaymentApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.0.status_code();
        let error = match status {
            StatusCode::UNAUTHORIZED => "WEBHOOK_SIGNATURE_REJECTED",
            StatusCode::BAD_REQUEST => "WEBHOOK_MALFORMED",
            _ => "WEBHOOK_PROCESSING_FAILED",
        };

        let body = ErrorResponse {
            error: error.to_string(),
            message: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
