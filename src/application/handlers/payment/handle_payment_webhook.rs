//! HandlePaymentWebhookHandler - Command handler for processing gateway webhooks.
//!
//! The adapter verifies and routes the notification; this handler is the
//! caller that applies the normalized outcome to the commerce core. Events
//! the adapter does not act on are acknowledged without touching the core.

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::{json, Value};
use thiserror::Error;

use crate::domain::payment::{SessionStatus, WebhookAction, WebhookError};
use crate::ports::{CommerceCore, CoreError, PaymentError, PaymentProvider};

/// Command to handle a payment webhook.
#[derive(Debug, Clone)]
pub struct HandlePaymentWebhookCommand {
    /// Raw webhook payload, byte-exact as received.
    pub payload: Vec<u8>,

    /// Webhook signature header, if the request carried one.
    pub signature: Option<String>,
}

/// Result of webhook processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlePaymentWebhookResult {
    /// Outcome applied to the commerce core record.
    Applied {
        transaction_id: String,
        action: WebhookAction,
    },

    /// Event acknowledged without a record update (unsupported module or
    /// action, or no transaction id in the payload).
    Acknowledged { action: WebhookAction },
}

impl HandlePaymentWebhookResult {
    /// The normalized action reported to the gateway in the response.
    pub fn action(&self) -> WebhookAction {
        match self {
            Self::Applied { action, .. } | Self::Acknowledged { action } => *action,
        }
    }
}

/// Errors from webhook processing.
#[derive(Debug, Error)]
pub enum WebhookHandlingError {
    /// The adapter rejected the notification.
    #[error(transparent)]
    Provider(#[from] PaymentError),

    /// The outcome could not be persisted; the gateway should redeliver.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl WebhookHandlingError {
    /// Maps the error to the HTTP status the webhook endpoint returns.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookHandlingError::Provider(PaymentError::Webhook(err)) => err.status_code(),
            // A non-webhook provider error cannot occur on this pure-CPU
            // path; treat it as a server fault if it ever does.
            WebhookHandlingError::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
            // 5xx prompts the gateway to retry delivery.
            WebhookHandlingError::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns true if redelivery of the same event may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            WebhookHandlingError::Provider(PaymentError::Webhook(err)) => err.is_retryable(),
            WebhookHandlingError::Provider(err) => err.is_retryable(),
            WebhookHandlingError::Core(err) => err.is_retryable(),
        }
    }
}

/// Handler for processing payment gateway webhooks.
///
/// Verifies and routes the event through the payment provider, then
/// persists the mapped outcome via the commerce core port.
pub struct HandlePaymentWebhookHandler {
    provider: Arc<dyn PaymentProvider>,
    commerce_core: Arc<dyn CommerceCore>,
}

impl HandlePaymentWebhookHandler {
    pub fn new(provider: Arc<dyn PaymentProvider>, commerce_core: Arc<dyn CommerceCore>) -> Self {
        Self {
            provider,
            commerce_core,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandlePaymentWebhookCommand,
    ) -> Result<HandlePaymentWebhookResult, WebhookHandlingError> {
        // 1. Verify signature and route to a normalized action
        let outcome = self
            .provider
            .handle_webhook(&cmd.payload, cmd.signature.as_deref())?;

        // 2. Unsupported events never reach the commerce core
        if outcome.action == WebhookAction::NotSupported {
            tracing::info!("webhook acknowledged without action");
            return Ok(HandlePaymentWebhookResult::Acknowledged {
                action: outcome.action,
            });
        }

        // 3. Apply the outcome to the payment record
        let Some(transaction_id) = outcome.data.get("id").and_then(Value::as_str) else {
            tracing::warn!(
                action = ?outcome.action,
                "webhook payload carries no transaction id; acknowledged without update"
            );
            return Ok(HandlePaymentWebhookResult::Acknowledged {
                action: outcome.action,
            });
        };
        let transaction_id = transaction_id.to_string();

        let status = SessionStatus::from_charge(&outcome.data);
        self.commerce_core
            .update_record(
                &transaction_id,
                json!({
                    "status": status,
                    "raw": outcome.data,
                }),
            )
            .await?;

        tracing::info!(
            transaction_id = %transaction_id,
            action = ?outcome.action,
            ?status,
            "webhook outcome applied"
        );

        Ok(HandlePaymentWebhookResult::Applied {
            transaction_id,
            action: outcome.action,
        })
    }
}

// Surfacing the adapter's signature errors by name keeps the endpoint's
// status mapping in one place.
impl From<WebhookError> for WebhookHandlingError {
    fn from(err: WebhookError) -> Self {
        Self::Provider(PaymentError::Webhook(err))
    }
}
