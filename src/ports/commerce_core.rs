//! Commerce core collaborator port.
//!
//! The commerce core owns payment records and their persistence; this
//! subsystem only reports normalized outcomes into it. The payment provider
//! adapter itself never calls this port - it returns `{action, data}` and
//! the application layer applies the result here.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors from commerce core updates.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No record exists for the given transaction id.
    #[error("payment record not found: {0}")]
    RecordNotFound(String),

    /// Persisting the update failed; safe to retry via redelivery.
    #[error("commerce core update failed: {0}")]
    UpdateFailed(String),
}

impl CoreError {
    /// Returns true if the gateway should redeliver the triggering event.
    pub fn is_retryable(&self) -> bool {
        // RecordNotFound may be eventual consistency with the initiating
        // call; redelivery can succeed once the record lands.
        true
    }
}

/// Port into the commerce core's payment records.
///
/// Implementations must serialize writes per record id (e.g. a single-row
/// update); status re-derivation makes last-applied-wins safe under that
/// guarantee.
#[async_trait]
pub trait CommerceCore: Send + Sync {
    /// Merge partial fields into the payment record identified by `id`.
    async fn update_record(&self, id: &str, fields: Value) -> Result<(), CoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commerce_core_is_object_safe() {
        fn _accepts_dyn(_core: &dyn CommerceCore) {}
    }

    #[test]
    fn core_errors_are_retryable() {
        assert!(CoreError::RecordNotFound("tx_1".to_string()).is_retryable());
        assert!(CoreError::UpdateFailed("connection lost".to_string()).is_retryable());
    }

    #[test]
    fn errors_display_their_context() {
        let err = CoreError::RecordNotFound("tx_9".to_string());
        assert!(err.to_string().contains("tx_9"));
    }
}
