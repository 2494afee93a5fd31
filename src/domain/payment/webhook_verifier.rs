//! Gateway webhook signature verification.
//!
//! Mentom signs notifications with a keyed SHA-512 digest: the hex digest of
//! `secret + id + module + action + date` is sent in the `Webhook-Signature`
//! header. Verification recomputes the digest over the parsed envelope
//! fields and compares it against the header in constant time.
//!
//! # Security
//!
//! - Constant-time comparison to avoid timing side channels
//! - Missing header rejected before any JSON parsing
//! - Parse failures and missing envelope fields fail closed
//! - Without a configured secret, verification is skipped entirely
//!   (documented permissive mode for development)

use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha512};
use subtle::ConstantTimeEq;

use super::webhook_errors::WebhookError;
use super::webhook_event::MentomEvent;

/// Header carrying the hex SHA-512 digest on inbound notifications.
pub const WEBHOOK_SIGNATURE_HEADER: &str = "Webhook-Signature";

/// Verifier for gateway webhook signatures.
pub struct WebhookVerifier {
    /// Signing secret shared with the gateway dashboard; `None` disables
    /// verification.
    secret: Option<SecretString>,
}

impl WebhookVerifier {
    /// Creates a verifier that enforces signatures with the given secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(SecretString::new(secret.into())),
        }
    }

    /// Creates a verifier that accepts every notification unverified.
    ///
    /// Permissive mode exists for development setups where no signing
    /// secret has been provisioned yet; production configuration should
    /// always carry one.
    pub fn permissive() -> Self {
        Self { secret: None }
    }

    /// Build from an optional configured secret.
    pub fn from_secret(secret: Option<String>) -> Self {
        match secret {
            Some(secret) => Self::new(secret),
            None => Self::permissive(),
        }
    }

    /// Returns true if this verifier enforces signatures.
    pub fn is_enforcing(&self) -> bool {
        self.secret.is_some()
    }

    /// Verifies the notification signature and parses the event.
    ///
    /// # Verification Steps
    ///
    /// 1. Without a configured secret, skip verification and just parse
    /// 2. Require a non-empty signature header (before touching the body)
    /// 3. Parse the envelope; missing fields fail closed
    /// 4. Recompute the digest over `secret + id + module + action + date`
    /// 5. Compare against the header value in constant time
    ///
    /// # Errors
    ///
    /// - `MissingSignature` - header absent or empty while enforcing
    /// - `SignatureMismatch` - digest comparison failed
    /// - `Parse` - body is not a well-formed event envelope
    pub fn verify_and_parse(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> Result<MentomEvent, WebhookError> {
        let Some(secret) = &self.secret else {
            tracing::debug!("no webhook secret configured; accepting notification unverified");
            return parse_event(payload);
        };

        let signature = signature
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                tracing::warn!("webhook rejected: missing signature header");
                WebhookError::MissingSignature
            })?;

        let event = parse_event(payload)?;
        let expected = signature_base_digest(secret.expose_secret(), &event);

        if !constant_time_compare(expected.as_bytes(), signature.as_bytes()) {
            tracing::warn!(event_id = %event.id, "webhook rejected: signature mismatch");
            return Err(WebhookError::SignatureMismatch);
        }

        Ok(event)
    }
}

/// Compute the hex signature the gateway would attach to `event`.
///
/// Used by the mock gateway and test fixtures to construct validly signed
/// notifications.
pub fn sign_event(secret: &str, event: &MentomEvent) -> String {
    signature_base_digest(secret, event)
}

fn parse_event(payload: &[u8]) -> Result<MentomEvent, WebhookError> {
    serde_json::from_slice(payload).map_err(|e| {
        tracing::warn!(error = %e, "failed to parse webhook payload");
        WebhookError::Parse(e.to_string())
    })
}

/// Hex SHA-512 over the fixed-order base string.
fn signature_base_digest(secret: &str, event: &MentomEvent) -> String {
    let base = format!(
        "{}{}{}{}{}",
        secret, event.id, event.module, event.action, event.date
    );
    hex_encode(&Sha512::digest(base.as_bytes()))
}

/// Performs constant-time comparison of two byte slices.
///
/// Prevents timing attacks that could leak information about the expected
/// signature.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Encode bytes to a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
