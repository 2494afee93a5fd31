//! Payment session - the adapter's unit of work.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::idempotency::IdempotencyKey;
use super::status::SessionStatus;

/// Whether authorization and capture happen in one gateway call or two.
///
/// Fixed per adapter configuration, not per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureMode {
    /// Auth + capture in a single `/payment/sale` call.
    Sale,

    /// `/payment/auth` first, funds captured in a later call.
    AuthThenCapture,
}

/// Attempted to apply new provider data to a session already in a
/// terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("session is terminal ({0:?}); no further transition is permitted")]
pub struct TerminalSessionError(pub SessionStatus);

/// One payment attempt as tracked by the adapter.
///
/// The session never stores an interpreted status: [`PaymentSession::status`]
/// re-derives it from the last observed raw provider body on every call, so
/// raw data and interpreted state cannot drift apart. The caller persists
/// sessions; the adapter holds no state between calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSession {
    /// Transaction id assigned by the gateway on the first successful call.
    pub provider_transaction_id: Option<String>,

    /// Amount in minor currency units; immutable once authorized.
    pub amount: i64,

    /// Caller-supplied token collapsing duplicate initiations into one
    /// gateway-side charge.
    pub idempotency_key: IdempotencyKey,

    /// Last raw response or event body, retained verbatim for audit and
    /// for re-deriving status without another round trip.
    pub raw: Value,
}

impl PaymentSession {
    /// Build a session from the gateway's initiation response.
    ///
    /// The transaction id is lifted out of the body's `id` field; everything
    /// else stays in `raw` untouched.
    pub fn from_provider_response(
        amount: i64,
        idempotency_key: IdempotencyKey,
        raw: Value,
    ) -> Self {
        let provider_transaction_id = raw
            .get("id")
            .and_then(Value::as_str)
            .map(ToString::to_string);

        Self {
            provider_transaction_id,
            amount,
            idempotency_key,
            raw,
        }
    }

    /// Current status, derived from the last observed raw body.
    pub fn status(&self) -> SessionStatus {
        SessionStatus::from_charge(&self.raw)
    }

    /// Apply newer raw provider data (API response or accepted webhook).
    ///
    /// Last-applied-wins is safe because status is re-derived rather than
    /// accumulated; the caller's persistence layer is expected to serialize
    /// writes per transaction id. Terminal sessions reject further data.
    pub fn observe(&mut self, raw: Value) -> Result<(), TerminalSessionError> {
        let current = self.status();
        if current.is_terminal() {
            return Err(TerminalSessionError(current));
        }

        if self.provider_transaction_id.is_none() {
            self.provider_transaction_id = raw
                .get("id")
                .and_then(Value::as_str)
                .map(ToString::to_string);
        }
        self.raw = raw;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pending_session() -> PaymentSession {
        PaymentSession::from_provider_response(
            1000,
            IdempotencyKey::generate(),
            json!({"id": "tx_1", "status": {"status": "inprogress"}}),
        )
    }

    // ══════════════════════════════════════════════════════════════
    // Construction Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn lifts_transaction_id_from_response() {
        let session = pending_session();
        assert_eq!(session.provider_transaction_id.as_deref(), Some("tx_1"));
        assert_eq!(session.amount, 1000);
    }

    #[test]
    fn missing_id_leaves_transaction_unassigned() {
        let session = PaymentSession::from_provider_response(
            500,
            IdempotencyKey::generate(),
            json!({"status": {"status": "error"}}),
        );
        assert!(session.provider_transaction_id.is_none());
    }

    // ══════════════════════════════════════════════════════════════
    // Status Derivation Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn status_is_derived_from_raw_body() {
        let session = pending_session();
        assert_eq!(session.status(), SessionStatus::Pending);
    }

    #[test]
    fn status_tracks_observed_data() {
        let mut session = pending_session();

        session
            .observe(json!({"id": "tx_1", "status": {"status": "approved"}, "captured": false}))
            .unwrap();
        assert_eq!(session.status(), SessionStatus::Authorized);

        session
            .observe(json!({"id": "tx_1", "status": {"status": "approved"}, "captured": true}))
            .unwrap();
        assert_eq!(session.status(), SessionStatus::Captured);
    }

    // ══════════════════════════════════════════════════════════════
    // Terminality Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn captured_session_rejects_further_data() {
        let mut session = pending_session();
        session
            .observe(json!({"id": "tx_1", "status": {"status": "approved"}, "captured": true}))
            .unwrap();

        let result = session.observe(json!({"id": "tx_1", "status": {"status": "decline"}}));
        assert_eq!(result, Err(TerminalSessionError(SessionStatus::Captured)));
        assert_eq!(session.status(), SessionStatus::Captured);
    }

    #[test]
    fn canceled_session_rejects_further_data() {
        let mut session = pending_session();
        session
            .observe(json!({"id": "tx_1", "status": {"status": "decline"}}))
            .unwrap();

        let result =
            session.observe(json!({"id": "tx_1", "status": {"status": "approved"}, "captured": true}));
        assert_eq!(result, Err(TerminalSessionError(SessionStatus::Canceled)));
    }

    #[test]
    fn observe_backfills_transaction_id() {
        let mut session = PaymentSession::from_provider_response(
            500,
            IdempotencyKey::generate(),
            json!({"status": {"status": "inprogress"}}),
        );
        assert!(session.provider_transaction_id.is_none());

        session
            .observe(json!({"id": "tx_9", "status": {"status": "approved"}}))
            .unwrap();
        assert_eq!(session.provider_transaction_id.as_deref(), Some("tx_9"));
    }

    // ══════════════════════════════════════════════════════════════
    // Serialization Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn session_round_trips_through_json() {
        let session = pending_session();
        let encoded = serde_json::to_string(&session).unwrap();
        let decoded: PaymentSession = serde_json::from_str(&encoded).unwrap();

        assert_eq!(decoded.provider_transaction_id, session.provider_transaction_id);
        assert_eq!(decoded.amount, session.amount);
        assert_eq!(decoded.status(), SessionStatus::Pending);
    }
}
