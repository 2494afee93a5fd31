//! Gateway webhook event types.
//!
//! Defines the structures for parsing Mentom notification payloads.
//! The envelope fields `id`, `module`, `action` and `date` participate
//! verbatim in the signature base string, so they are captured exactly as
//! sent; the `data` payload is charge-shaped and runs through the same
//! status derivation as direct API responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Mentom webhook event envelope.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MentomEvent {
    /// Unique identifier assigned by the gateway.
    pub id: String,

    /// Originating gateway module (e.g. "payment").
    pub module: String,

    /// Event action (e.g. "capture", "refund", "updateStatus").
    pub action: String,

    /// Event date as sent by the gateway.
    pub date: String,

    /// Charge-shaped payload, same shape as a direct API response.
    #[serde(default)]
    pub data: Value,
}

impl MentomEvent {
    /// Returns true if this event originates from the payment module.
    ///
    /// Events from other modules never reach the commerce core.
    pub fn is_payment(&self) -> bool {
        self.module == "payment"
    }

    /// Parse the action string into a known variant.
    pub fn parsed_action(&self) -> MentomEventAction {
        MentomEventAction::from_str(&self.action)
    }

    /// Transaction id of the charge this event concerns, if present.
    pub fn transaction_id(&self) -> Option<&str> {
        self.data.get("id").and_then(Value::as_str)
    }
}

/// Known gateway event actions on the payment module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MentomEventAction {
    /// Funds were captured.
    Capture,
    /// Funds were refunded.
    Refund,
    /// Charge state changed; the payload carries the new state.
    UpdateStatus,
    /// Unknown or unhandled action.
    Unknown,
}

impl MentomEventAction {
    /// Parse an action from its wire string.
    pub fn from_str(s: &str) -> Self {
        match s {
            "capture" => Self::Capture,
            "refund" => Self::Refund,
            "updateStatus" => Self::UpdateStatus,
            _ => Self::Unknown,
        }
    }

    /// Convert to the gateway action string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Capture => "capture",
            Self::Refund => "refund",
            Self::UpdateStatus => "updateStatus",
            Self::Unknown => "unknown",
        }
    }
}
