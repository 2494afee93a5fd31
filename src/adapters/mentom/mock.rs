//! Mock payment provider for testing.
//!
//! Provides a configurable in-memory implementation of `PaymentProvider`
//! for unit and integration tests. Supports:
//! - Pre-configured charge bodies
//! - Error injection
//! - Call tracking
//! - Duplicate idempotency-key collapse (one logical charge per key)
//! - Validly signed webhook event fixtures

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::domain::payment::{
    route_event, sign_event, MentomEvent, PaymentSession, SessionStatus, WebhookOutcome,
    WebhookVerifier,
};
use crate::ports::{
    InitiatePaymentRequest, PaymentError, PaymentProvider, StatusOutcome,
};

/// Mock payment provider for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProvider::new();
///
/// // Configure the next gateway response
/// mock.set_next_charge(json!({"id": "tx_1", "status": {"status": "inprogress"}}));
///
/// // Inject errors
/// mock.set_error(PaymentError::transport("connection reset"));
///
/// // Use in tests
/// let session = mock.initiate(request).await?;
/// ```
#[derive(Default)]
pub struct MockPaymentProvider {
    /// Inner state (thread-safe for async tests).
    inner: Arc<Mutex<MockState>>,
}

/// Internal mutable state.
#[derive(Default)]
struct MockState {
    /// Gateway-side charges by transaction id.
    charges: HashMap<String, Value>,

    /// Idempotency keys already seen, mapped to the charge they created.
    idempotency_keys: HashMap<String, String>,

    /// Charge body to return on the next `initiate` call.
    next_charge: Option<Value>,

    /// Error to return on next call.
    next_error: Option<PaymentError>,

    /// Specific errors by method name.
    method_errors: HashMap<String, PaymentError>,

    /// Track method calls for assertions.
    call_log: Vec<MethodCall>,

    /// Webhook signing secret; absent means permissive verification.
    webhook_secret: Option<String>,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl MockPaymentProvider {
    /// Create a new mock provider with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that enforces webhook signatures with `secret`.
    pub fn with_webhook_secret(secret: impl Into<String>) -> Self {
        let mock = Self::new();
        mock.inner.lock().unwrap().webhook_secret = Some(secret.into());
        mock
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Set the charge body the gateway returns on the next `initiate`.
    pub fn set_next_charge(&self, charge: Value) {
        self.inner.lock().unwrap().next_charge = Some(charge);
    }

    /// Seed a charge into the gateway's "database".
    pub fn add_charge(&self, charge: Value) {
        if let Some(id) = charge.get("id").and_then(Value::as_str) {
            let id = id.to_string();
            self.inner.lock().unwrap().charges.insert(id, charge);
        }
    }

    /// Set an error to return on the next call to any method.
    pub fn set_error(&self, error: PaymentError) {
        self.inner.lock().unwrap().next_error = Some(error);
    }

    /// Set an error for a specific method.
    pub fn set_method_error(&self, method: &str, error: PaymentError) {
        self.inner
            .lock()
            .unwrap()
            .method_errors
            .insert(method.to_string(), error);
    }

    /// Clear all configured errors.
    pub fn clear_errors(&self) {
        let mut state = self.inner.lock().unwrap();
        state.next_error = None;
        state.method_errors.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Inspection
    // ════════════════════════════════════════════════════════════════════════════

    /// Number of distinct gateway-side charges created so far.
    pub fn charge_count(&self) -> usize {
        self.inner.lock().unwrap().charges.len()
    }

    /// Fetch a stored charge body.
    pub fn charge(&self, transaction_id: &str) -> Option<Value> {
        self.inner.lock().unwrap().charges.get(transaction_id).cloned()
    }

    /// Get all recorded method calls.
    pub fn calls(&self) -> Vec<MethodCall> {
        self.inner.lock().unwrap().call_log.clone()
    }

    /// Check if a method was called.
    pub fn was_called(&self, method: &str) -> bool {
        self.inner
            .lock()
            .unwrap()
            .call_log
            .iter()
            .any(|c| c.method == method)
    }

    /// Get count of calls to a method.
    pub fn call_count(&self, method: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().call_log.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Internal Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn record_call(&self, method: &str, args: Vec<String>) {
        self.inner.lock().unwrap().call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
    }

    fn check_error(&self, method: &str) -> Result<(), PaymentError> {
        let mut state = self.inner.lock().unwrap();

        // Check method-specific error first
        if let Some(error) = state.method_errors.remove(method) {
            return Err(error);
        }

        // Check global error (consumes it)
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        Ok(())
    }

    fn charge_or_not_found(state: &MockState, transaction_id: &str) -> Result<Value, PaymentError> {
        state
            .charges
            .get(transaction_id)
            .cloned()
            .ok_or_else(|| PaymentError::Gateway {
                status: 404,
                body: format!("charge {} not found", transaction_id),
            })
    }
}

impl Clone for MockPaymentProvider {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn initiate(
        &self,
        request: InitiatePaymentRequest,
    ) -> Result<PaymentSession, PaymentError> {
        self.record_call(
            "initiate",
            vec![
                request.amount.to_string(),
                request.idempotency_key.to_string(),
            ],
        );
        self.check_error("initiate")?;

        let card = &request.details.card;
        if card.number.is_empty() || card.exp.is_empty() || card.cvv.is_empty() {
            return Err(PaymentError::validation(
                "missing required card fields (number, exp, cvv)",
            ));
        }

        let mut state = self.inner.lock().unwrap();

        // A key the gateway has already seen maps back to the same charge;
        // no second charge is created.
        if let Some(existing) = state
            .idempotency_keys
            .get(request.idempotency_key.as_str())
        {
            let raw = state.charges[existing].clone();
            return Ok(PaymentSession::from_provider_response(
                request.amount,
                request.idempotency_key,
                raw,
            ));
        }

        let raw = state.next_charge.take().unwrap_or_else(|| {
            let id = format!(
                "tx_mock_{}",
                uuid::Uuid::new_v4().to_string().split('-').next().unwrap()
            );
            json!({
                "id": id,
                "amount": request.amount,
                "status": {"status": "approved"},
                "captured": false
            })
        });

        if let Some(id) = raw.get("id").and_then(Value::as_str) {
            let id = id.to_string();
            state.charges.insert(id.clone(), raw.clone());
            state
                .idempotency_keys
                .insert(request.idempotency_key.as_str().to_string(), id);
        }

        Ok(PaymentSession::from_provider_response(
            request.amount,
            request.idempotency_key,
            raw,
        ))
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
        self.record_call(
            "capture",
            vec![
                transaction_id.to_string(),
                amount.map(|a| a.to_string()).unwrap_or_else(|| "full".to_string()),
            ],
        );
        self.check_error("capture")?;

        let mut state = self.inner.lock().unwrap();
        let mut charge = Self::charge_or_not_found(&state, transaction_id)?;

        charge["status"] = json!({"status": "approved"});
        charge["captured"] = json!(true);
        if let Some(amount) = amount {
            charge["captured_amount"] = json!(amount);
        }

        state.charges.insert(transaction_id.to_string(), charge.clone());
        Ok(charge)
    }

    async fn refund(
        &self,
        transaction_id: &str,
        amount: Option<i64>,
    ) -> Result<Value, PaymentError> {
        self.record_call(
            "refund",
            vec![
                transaction_id.to_string(),
                amount.map(|a| a.to_string()).unwrap_or_else(|| "none".to_string()),
            ],
        );
        self.check_error("refund")?;

        let mut state = self.inner.lock().unwrap();
        let mut charge = Self::charge_or_not_found(&state, transaction_id)?;

        let captured = charge
            .get("captured")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        match amount {
            Some(amount) => {
                charge["refunded_amount"] = json!(amount);
            }
            // A bare refund voids an uncaptured charge and fully refunds a
            // captured one, mirroring the gateway's cancel semantics.
            None if captured => {
                let full = charge.get("amount").and_then(Value::as_i64).unwrap_or(0);
                charge["refunded_amount"] = json!(full);
            }
            None => {
                charge["status"] = json!({"status": "decline"});
            }
        }

        state.charges.insert(transaction_id.to_string(), charge.clone());
        Ok(charge)
    }

    async fn cancel(&self, transaction_id: &str) -> Result<Value, PaymentError> {
        self.refund(transaction_id, None).await
    }

    async fn retrieve(&self, transaction_id: &str) -> Result<Value, PaymentError> {
        self.record_call("retrieve", vec![transaction_id.to_string()]);
        self.check_error("retrieve")?;

        let state = self.inner.lock().unwrap();
        Self::charge_or_not_found(&state, transaction_id)
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
        self.record_call(
            "handle_webhook",
            vec![String::from_utf8_lossy(raw_body).chars().take(50).collect()],
        );
        self.check_error("handle_webhook")?;

        let secret = self.inner.lock().unwrap().webhook_secret.clone();
        let verifier = WebhookVerifier::from_secret(secret);
        let event = verifier.verify_and_parse(raw_body, signature)?;
        Ok(route_event(&event))
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Test Helpers
// ════════════════════════════════════════════════════════════════════════════════

impl MockPaymentProvider {
    /// Build a payment-module event and its valid signature.
    ///
    /// The signature is computed with this mock's configured secret; for a
    /// permissive mock it is computed with an empty secret, which a real
    /// verifier would reject.
    pub fn signed_payment_event(&self, action: &str, data: Value) -> (Vec<u8>, String) {
        let event = MentomEvent {
            id: format!("evt_{}", uuid::Uuid::new_v4()),
            module: "payment".to_string(),
            action: action.to_string(),
            date: chrono::Utc::now().to_rfc3339(),
            data,
        };

        let secret = self
            .inner
            .lock()
            .unwrap()
            .webhook_secret
            .clone()
            .unwrap_or_default();
        let signature = sign_event(&secret, &event);

        (serde_json::to_vec(&event).expect("event serializes"), signature)
    }

    /// Build an `updateStatus` event payload for a stored charge state.
    pub fn update_status_event(
        &self,
        transaction_id: &str,
        status: &str,
        captured: bool,
    ) -> (Vec<u8>, String) {
        self.signed_payment_event(
            "updateStatus",
            json!({
                "id": transaction_id,
                "status": {"status": status},
                "captured": captured
            }),
        )
    }
}
