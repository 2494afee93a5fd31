//! Payment provider port for external payment processing.
//!
//! Defines the lifecycle contract between the commerce core and a card
//! payment gateway: initiate → authorize → capture/refund/cancel → status
//! query, plus webhook handling. Implementations translate this contract
//! into a specific gateway's REST dialect.
//!
//! # Design
//!
//! - **Gateway agnostic**: the commerce core only sees this interface
//! - **Stateless**: the caller persists sessions; implementations hold no
//!   state between calls
//! - **Idempotent initiation**: a caller-supplied key collapses retried
//!   submissions into one gateway-side charge

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::payment::{
    IdempotencyKey, PaymentSession, SessionStatus, WebhookError, WebhookOutcome,
};

/// Port for payment gateway integrations.
///
/// Synchronous lifecycle calls are bounded-timeout network I/O; `authorize`
/// and `handle_webhook` are pure CPU and never touch the network.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a charge at the gateway.
    ///
    /// Validates payment details locally before anything is sent upstream;
    /// the idempotency key is forwarded so repeated calls with identical
    /// input produce one charge.
    async fn initiate(
        &self,
        request: InitiatePaymentRequest,
    ) -> Result<PaymentSession, PaymentError>;

    /// Re-derive the session state from raw data already in hand.
    ///
    /// No network call: used when the caller holds a fresh body, e.g.
    /// right after `initiate`.
    fn authorize(&self, raw: &Value) -> StatusOutcome;

    /// Capture a previously authorized charge.
    ///
    /// An omitted amount captures the full authorized amount, per gateway
    /// convention.
    async fn capture(
        &self,
        transaction_id: &str,
        amount: Option<i64>,
    ) -> Result<Value, PaymentError>;

    /// Refund a charge, fully or partially.
    ///
    /// An omitted amount carries the gateway's cancel semantics; see
    /// [`PaymentProvider::cancel`].
    async fn refund(
        &self,
        transaction_id: &str,
        amount: Option<i64>,
    ) -> Result<Value, PaymentError>;

    /// Void an authorized-but-uncaptured charge.
    ///
    /// The gateway has no distinct void endpoint; cancel is a refund with
    /// no amount. On an already-captured charge this therefore behaves as
    /// a full refund, not an error.
    async fn cancel(&self, transaction_id: &str) -> Result<Value, PaymentError>;

    /// Fetch the current charge body. Read-only, no side effects.
    async fn retrieve(&self, transaction_id: &str) -> Result<Value, PaymentError>;

    /// Fetch the charge and derive its session status.
    async fn get_status(&self, transaction_id: &str) -> Result<StatusOutcome, PaymentError>;

    /// Delete a payment session.
    ///
    /// The gateway offers no deletion; this degrades to `cancel`.
    async fn delete(&self, transaction_id: &str) -> Result<Value, PaymentError> {
        self.cancel(transaction_id).await
    }

    /// Update session data.
    ///
    /// The gateway has no update endpoint; data passes through unchanged.
    fn update(&self, raw: &Value) -> Value {
        raw.clone()
    }

    /// Verify an inbound notification and map it to a normalized action.
    ///
    /// Verification failures reject the event outright with no partial
    /// processing; well-formed events outside the payment module come back
    /// as `NotSupported` rather than an error.
    fn handle_webhook(
        &self,
        raw_body: &[u8],
        signature: Option<&str>,
    ) -> Result<WebhookOutcome, PaymentError>;
}

/// Request to create a charge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitiatePaymentRequest {
    /// Amount in minor currency units.
    pub amount: i64,

    /// Card and origin details forwarded to the gateway.
    pub details: PaymentDetails,

    /// Idempotency key for safe retries.
    pub idempotency_key: IdempotencyKey,
}

/// Payment details required to create a charge.
#[derive(Clone, Serialize, Deserialize)]
pub struct PaymentDetails {
    /// Card data entered by the customer.
    pub card: CardDetails,

    /// Client IP address, required by the gateway for risk scoring.
    pub ip: String,

    /// Transaction source channel; defaults to "Internet" on the wire.
    pub source: Option<String>,

    /// Processing level; defaults to 1 on the wire.
    pub level: Option<u32>,

    /// Additional gateway fields passed through verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PaymentDetails {
    /// Build details from the required fields only.
    pub fn new(card: CardDetails, ip: impl Into<String>) -> Self {
        Self {
            card,
            ip: ip.into(),
            source: None,
            level: None,
            extra: Map::new(),
        }
    }
}

// Card data must never leak into logs; Debug shows field presence only.
impl std::fmt::Debug for PaymentDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentDetails")
            .field("card", &self.card)
            .field("ip", &self.ip)
            .field("source", &self.source)
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}

/// Raw card data.
#[derive(Clone, Serialize, Deserialize)]
pub struct CardDetails {
    /// Primary account number.
    pub number: String,

    /// Expiry in the gateway's MMYY format.
    pub exp: String,

    /// Card verification value.
    pub cvv: String,
}

impl std::fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let last4 = if self.number.len() >= 4 {
            &self.number[self.number.len() - 4..]
        } else {
            ""
        };
        f.debug_struct("CardDetails")
            .field("number", &format_args!("****{}", last4))
            .field("exp", &self.exp)
            .field("cvv", &"***")
            .finish()
    }
}

/// A session status together with the raw body it was derived from.
#[derive(Debug, Clone)]
pub struct StatusOutcome {
    /// Derived session status.
    pub status: SessionStatus,

    /// Raw charge body the status was derived from.
    pub raw: Value,
}

/// Errors from payment provider operations.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Malformed or missing required input. Local and immediate; never
    /// sent upstream.
    #[error("invalid payment request: {0}")]
    Validation(String),

    /// Network failure or timeout talking to the gateway. Retryable at
    /// the caller's discretion; the adapter performs no automatic retry.
    #[error("gateway transport failure: {0}")]
    Transport(String),

    /// Non-2xx response from the gateway. The body is preserved for
    /// diagnostics but not trusted for status derivation.
    #[error("gateway returned HTTP {status}: {body}")]
    Gateway { status: u16, body: String },

    /// Webhook verification or parsing failed; the event was rejected
    /// with no side effects.
    #[error(transparent)]
    Webhook(#[from] WebhookError),
}

impl PaymentError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Check if the failed operation may succeed on retry.
    ///
    /// Only transport failures qualify; everything else is deterministic
    /// for the same input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PaymentError::Transport(_))
    }
}
