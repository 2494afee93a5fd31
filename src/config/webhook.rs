//! Webhook configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Webhook verification configuration
///
/// The signing secret is optional: when absent, inbound notifications are
/// accepted without verification (permissive mode for development).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookConfig {
    /// Webhook signing secret shared with the gateway dashboard
    pub secret: Option<String>,
}

impl WebhookConfig {
    /// Check if signature verification is enforced
    pub fn is_enforcing(&self) -> bool {
        self.secret.is_some()
    }

    /// Validate webhook configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(secret) = &self.secret {
            if secret.is_empty() {
                return Err(ValidationError::InvalidWebhookSecret);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_secret_is_permissive() {
        let config = WebhookConfig::default();
        assert!(!config.is_enforcing());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn present_secret_enforces() {
        let config = WebhookConfig {
            secret: Some("whk_secret".to_string()),
        };
        assert!(config.is_enforcing());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_secret_rejected() {
        let config = WebhookConfig {
            secret: Some(String::new()),
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidWebhookSecret)
        ));
    }
}
