//! Idempotency keys for safe payment initiation retries.
//!
//! A network timeout on `initiate` must not produce a duplicate charge. The
//! caller supplies an opaque token that is forwarded verbatim as the
//! `Idempotency-Key` request header; the gateway treats repeat calls with
//! the same key as the same charge. The adapter performs no local
//! deduplication - the key is the sole correctness mechanism on this path.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Header carrying the idempotency token on initiation requests.
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// The supplied idempotency key is unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("idempotency key must not be empty")]
pub struct InvalidIdempotencyKey;

/// Opaque caller-supplied idempotency token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdempotencyKey(String);

impl IdempotencyKey {
    /// Wrap a caller-supplied token.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIdempotencyKey` for an empty token, which the
    /// gateway would silently treat as "no idempotency".
    pub fn new(key: impl Into<String>) -> Result<Self, InvalidIdempotencyKey> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(InvalidIdempotencyKey);
        }
        Ok(Self(key))
    }

    /// Generate a fresh random key for callers without their own scheme.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// The token as sent on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
