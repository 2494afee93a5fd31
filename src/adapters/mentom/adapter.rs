//! Mentom payment provider adapter.
//!
//! Implements the `PaymentProvider` trait against the Mentom gateway REST
//! dialect. Owns the HTTP transport, delegates status derivation and
//! webhook verification to the payment domain.
//!
//! # Security
//!
//! - Keyed SHA-512 webhook signature verification with constant-time
//!   comparison
//! - Secrets handled via `secrecy::SecretString`
//! - Card data validated locally; validation failures never reach the wire
//!
//! # Configuration
//!
//! ```ignore
//! let config = MentomConfig::new(api_key, terminal_id)
//!     .with_capture_mode(CaptureMode::Sale)
//!     .with_webhook_secret(secret);
//! let adapter = MentomPaymentAdapter::new(config);
//! ```

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use crate::config::{AppConfig, DEFAULT_BASE_URL};
use crate::domain::payment::{
    route_event, CaptureMode, PaymentSession, SessionStatus, WebhookOutcome, WebhookVerifier,
    IDEMPOTENCY_KEY_HEADER,
};
use crate::ports::{
    InitiatePaymentRequest, PaymentDetails, PaymentError, PaymentProvider, StatusOutcome,
};

use super::client::GatewayClient;
use super::wire::{CaptureRequest, ChargeRequest, RefundRequest, Terminal};

/// Mentom gateway configuration for the adapter.
#[derive(Clone)]
pub struct MentomConfig {
    /// Secret API key issued by Mentom.
    api_key: SecretString,

    /// Gateway / dashboard terminal id.
    terminal_id: u64,

    /// Whether initiation runs auth + capture in one call.
    capture_mode: CaptureMode,

    /// Base URL for the gateway API.
    base_url: String,

    /// Fixed request timeout.
    request_timeout: Duration,

    /// Webhook signing secret; absent means permissive verification.
    webhook_secret: Option<SecretString>,
}

impl MentomConfig {
    /// Create a configuration with production defaults.
    pub fn new(api_key: impl Into<String>, terminal_id: u64) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            terminal_id,
            capture_mode: CaptureMode::AuthThenCapture,
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(15),
            webhook_secret: None,
        }
    }

    /// Build from loaded application configuration.
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            api_key: SecretString::new(config.gateway.api_key.clone()),
            terminal_id: config.gateway.terminal_id,
            capture_mode: config.gateway.capture_mode(),
            base_url: config.gateway.base_url.clone(),
            request_timeout: Duration::from_secs(config.gateway.request_timeout_secs),
            webhook_secret: config
                .webhook
                .secret
                .clone()
                .map(SecretString::new),
        }
    }

    /// Set a custom base URL (sandbox host).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Select the capture mode.
    pub fn with_capture_mode(mut self, mode: CaptureMode) -> Self {
        self.capture_mode = mode;
        self
    }

    /// Set the webhook signing secret.
    pub fn with_webhook_secret(mut self, secret: impl Into<String>) -> Self {
        self.webhook_secret = Some(SecretString::new(secret.into()));
        self
    }

    /// Override the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Mentom payment provider adapter.
///
/// Implements `PaymentProvider` for the Mentom gateway.
pub struct MentomPaymentAdapter {
    config: MentomConfig,
    client: GatewayClient,
    verifier: WebhookVerifier,
}

impl MentomPaymentAdapter {
    /// Create an adapter from its configuration.
    pub fn new(config: MentomConfig) -> Self {
        let client = GatewayClient::new(
            config.base_url.clone(),
            config.api_key.clone(),
            config.request_timeout,
        );
        let verifier = WebhookVerifier::from_secret(
            config
                .webhook_secret
                .as_ref()
                .map(|s| s.expose_secret().clone()),
        );

        Self {
            config,
            client,
            verifier,
        }
    }

    fn terminal(&self) -> Terminal {
        Terminal {
            id: self.config.terminal_id,
        }
    }

    /// Local precondition check; rejected requests never reach the wire.
    fn validate_details(details: &PaymentDetails) -> Result<(), PaymentError> {
        let card = &details.card;
        if card.number.trim().is_empty()
            || card.exp.trim().is_empty()
            || card.cvv.trim().is_empty()
        {
            return Err(PaymentError::validation(
                "missing required card fields (number, exp, cvv)",
            ));
        }
        if details.ip.trim().is_empty() {
            return Err(PaymentError::validation("missing client ip"));
        }
        Ok(())
    }
}

#[async_trait]
impl PaymentProvider for MentomPaymentAdapter {
    async fn initiate(
        &self,
        request: InitiatePaymentRequest,
    ) -> Result<PaymentSession, PaymentError> {
        Self::validate_details(&request.details)?;

        let body = serde_json::to_value(ChargeRequest::new(
            self.config.terminal_id,
            request.amount,
            &request.details,
        ))
        .map_err(|e| PaymentError::validation(format!("unserializable payment details: {}", e)))?;

        let path = match self.config.capture_mode {
            CaptureMode::Sale => "/payment/sale",
            CaptureMode::AuthThenCapture => "/payment/auth",
        };

        let raw = self
            .client
            .post_with_headers(
                path,
                &body,
                &[(IDEMPOTENCY_KEY_HEADER, request.idempotency_key.as_str())],
            )
            .await?;

        let session =
            PaymentSession::from_provider_response(request.amount, request.idempotency_key, raw);

        tracing::info!(
            transaction_id = session.provider_transaction_id.as_deref().unwrap_or("<none>"),
            amount = session.amount,
            status = ?session.status(),
            "payment initiated"
        );

        Ok(session)
    }

    fn authorize(&self, raw: &Value) -> StatusOutcome {
        StatusOutcome {
            status: SessionStatus::from_charge(raw),
            raw: raw.clone(),
        }
    }

    async fn capture(
        &self,
        transaction_id: &str,
        amount: Option<i64>,
    ) -> Result<Value, PaymentError> {
        let body = serde_json::to_value(CaptureRequest {
            terminal: self.terminal(),
            amount,
        })
        .map_err(|e| PaymentError::validation(e.to_string()))?;

        let raw = self
            .client
            .post(&format!("/payment/{}/capture", transaction_id), &body)
            .await?;

        tracing::info!(transaction_id, ?amount, "payment captured");
        Ok(raw)
    }

    async fn refund(
        &self,
        transaction_id: &str,
        amount: Option<i64>,
    ) -> Result<Value, PaymentError> {
        let body = serde_json::to_value(RefundRequest {
            terminal: self.terminal(),
            amount,
        })
        .map_err(|e| PaymentError::validation(e.to_string()))?;

        let raw = self
            .client
            .post(&format!("/payment/{}/refund", transaction_id), &body)
            .await?;

        tracing::info!(transaction_id, ?amount, "payment refunded");
        Ok(raw)
    }

    async fn cancel(&self, transaction_id: &str) -> Result<Value, PaymentError> {
        // Mentom voids via a refund with no amount; there is no distinct
        // void endpoint. Canceling an already-captured charge therefore
        // behaves as a full refund.
        self.refund(transaction_id, None).await
    }

    async fn retrieve(&self, transaction_id: &str) -> Result<Value, PaymentError> {
        self.client
            .get(&format!("/payment/{}", transaction_id))
            .await
    }

    async fn get_status(&self, transaction_id: &str) -> Result<StatusOutcome, PaymentError> {
        let raw = self.retrieve(transaction_id).await?;
        Ok(StatusOutcome {
            status: SessionStatus::from_charge(&raw),
            raw,
        })
    }

    fn handle_webhook(
        &self,
        raw_body: &[u8],
        signature: Option<&str>,
    ) -> Result<WebhookOutcome, PaymentError> {
        let event = self.verifier.verify_and_parse(raw_body, signature)?;
        let outcome = route_event(&event);

        tracing::info!(
            event_id = %event.id,
            module = %event.module,
            action = ?outcome.action,
            "payment webhook routed"
        );

        Ok(outcome)
    }
}
