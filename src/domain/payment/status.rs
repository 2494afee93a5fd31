//! Session status derivation from raw gateway charge bodies.
//!
//! Status is always a pure function of the most recently observed provider
//! data. Nothing in the adapter stores an interpreted status next to the raw
//! body it was derived from, so the two can never drift apart.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifecycle status of a payment session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Charge submitted, outcome not yet known.
    Pending,

    /// Funds reserved, capture still outstanding.
    Authorized,

    /// Funds captured. Terminal.
    Captured,

    /// Charge declined or voided. Terminal.
    Canceled,

    /// Gateway reported a processing error.
    Error,

    /// Gateway requires further cardholder interaction.
    RequiresMore,
}

impl SessionStatus {
    /// Check whether this status permits no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Captured | SessionStatus::Canceled)
    }

    /// Derive the session status from a raw gateway charge body.
    ///
    /// The gateway reports its state in `charge.status.status` (matched
    /// case-insensitively) with a sibling `captured` flag distinguishing a
    /// settled charge from a mere authorization:
    ///
    /// | gateway status | captured | result       |
    /// |----------------|----------|--------------|
    /// | approved       | true     | `Captured`   |
    /// | approved       | false    | `Authorized` |
    /// | inprogress     | -        | `Pending`    |
    /// | decline        | -        | `Canceled`   |
    /// | error          | -        | `Error`      |
    /// | anything else  | -        | `Pending`    |
    ///
    /// Unrecognized or missing fields fall back to `Pending` so that a
    /// malformed body can never promote a charge to a settled state.
    pub fn from_charge(charge: &Value) -> Self {
        let status = charge
            .get("status")
            .and_then(|s| s.get("status"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_ascii_lowercase();

        let captured = charge
            .get("captured")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        match status.as_str() {
            "approved" => {
                if captured {
                    SessionStatus::Captured
                } else {
                    SessionStatus::Authorized
                }
            }
            "inprogress" => SessionStatus::Pending,
            "decline" => SessionStatus::Canceled,
            "error" => SessionStatus::Error,
            _ => SessionStatus::Pending,
        }
    }
}
