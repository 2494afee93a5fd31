//! Routing of verified webhook events to normalized commerce actions.
//!
//! A notification moves through Received → Verified → Routed; this module
//! implements the tail of that machine. Events outside the payment module
//! terminate at `NotSupported` without ever reaching the commerce core;
//! payment events map to a normalized [`WebhookAction`] the core
//! understands.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::status::SessionStatus;
use super::webhook_event::{MentomEvent, MentomEventAction};

/// Normalized outcome returned to the commerce core after processing a
/// notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookAction {
    /// Payment completed (capture or refund confirmed).
    Successful,
    /// Funds reserved, awaiting capture.
    Authorized,
    /// Charge declined or voided.
    Canceled,
    /// Gateway reported a processing error.
    Failed,
    /// Outcome not yet known.
    Pending,
    /// Further cardholder interaction required.
    RequiresMore,
    /// Well-formed event the adapter does not act on.
    NotSupported,
}

impl From<SessionStatus> for WebhookAction {
    /// Mapping applied to `updateStatus` events: the new charge state is
    /// derived from the payload and translated into its action.
    fn from(status: SessionStatus) -> Self {
        match status {
            SessionStatus::Captured => WebhookAction::Successful,
            SessionStatus::Authorized => WebhookAction::Authorized,
            SessionStatus::Canceled => WebhookAction::Canceled,
            SessionStatus::Error => WebhookAction::Failed,
            SessionStatus::Pending => WebhookAction::Pending,
            SessionStatus::RequiresMore => WebhookAction::RequiresMore,
        }
    }
}

/// Result of routing a verified event: the normalized action plus the raw
/// charge payload for the caller to persist.
#[derive(Debug, Clone)]
pub struct WebhookOutcome {
    /// Normalized action for the commerce core.
    pub action: WebhookAction,

    /// Charge-shaped payload, passed through verbatim.
    pub data: Value,
}

/// Route a verified event to its normalized action.
///
/// - Non-payment modules yield `NotSupported` regardless of action.
/// - `capture` and `refund` both confirm a completed money movement and
///   yield `Successful`.
/// - `updateStatus` derives the action from the payload's charge state.
/// - Unknown actions yield `NotSupported`.
pub fn route_event(event: &MentomEvent) -> WebhookOutcome {
    if !event.is_payment() {
        return WebhookOutcome {
            action: WebhookAction::NotSupported,
            data: event.data.clone(),
        };
    }

    let action = match event.parsed_action() {
        MentomEventAction::Capture | MentomEventAction::Refund => WebhookAction::Successful,
        MentomEventAction::UpdateStatus => {
            WebhookAction::from(SessionStatus::from_charge(&event.data))
        }
        MentomEventAction::Unknown => WebhookAction::NotSupported,
    };

    WebhookOutcome {
        action,
        data: event.data.clone(),
    }
}
