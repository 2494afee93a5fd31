//! Gateway configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::payment::CaptureMode;

/// Production gateway host; override `base_url` to point at the sandbox.
pub const DEFAULT_BASE_URL: &str = "https://gateway.mentomdashboard.com";

/// Gateway request timeout, by convention.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Mentom gateway configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Secret API key issued by Mentom
    #[serde(default)]
    pub api_key: String,

    /// Gateway / dashboard terminal id
    #[serde(default)]
    pub terminal_id: u64,

    /// When true, initiation runs auth + capture in one `/payment/sale`
    /// call instead of `/payment/auth` followed by a capture
    #[serde(default)]
    pub capture: bool,

    /// Override for the sandbox host
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl GatewayConfig {
    /// The capture mode this configuration selects.
    ///
    /// Fixed per adapter configuration, not per session.
    pub fn capture_mode(&self) -> CaptureMode {
        if self.capture {
            CaptureMode::Sale
        } else {
            CaptureMode::AuthThenCapture
        }
    }

    /// Check if pointing at a non-production host
    pub fn is_sandbox(&self) -> bool {
        self.base_url != DEFAULT_BASE_URL
    }

    /// Validate gateway configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_key.is_empty() {
            return Err(ValidationError::MissingRequired("MENTOM__GATEWAY__API_KEY"));
        }
        if self.terminal_id == 0 {
            return Err(ValidationError::InvalidTerminalId);
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl);
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            terminal_id: 0,
            capture: false,
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> GatewayConfig {
        GatewayConfig {
            api_key: "mk_test_abc123".to_string(),
            terminal_id: 42,
            ..Default::default()
        }
    }

    #[test]
    fn defaults_point_at_production() {
        let config = GatewayConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout_secs, 15);
        assert!(!config.is_sandbox());
    }

    #[test]
    fn capture_flag_selects_sale_mode() {
        let mut config = valid_config();
        assert_eq!(config.capture_mode(), CaptureMode::AuthThenCapture);

        config.capture = true;
        assert_eq!(config.capture_mode(), CaptureMode::Sale);
    }

    #[test]
    fn sandbox_detected_from_base_url() {
        let mut config = valid_config();
        config.base_url = "https://sandbox.mentomdashboard.com".to_string();
        assert!(config.is_sandbox());
    }

    #[test]
    fn validation_missing_api_key() {
        let config = GatewayConfig {
            terminal_id: 42,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired(_))
        ));
    }

    #[test]
    fn validation_zero_terminal_id() {
        let config = GatewayConfig {
            api_key: "mk_test_abc123".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidTerminalId)
        ));
    }

    #[test]
    fn validation_bad_base_url() {
        let mut config = valid_config();
        config.base_url = "gateway.mentomdashboard.com".to_string();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidBaseUrl)
        ));
    }

    #[test]
    fn validation_timeout_out_of_range() {
        let mut config = valid_config();
        config.request_timeout_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidTimeout)
        ));

        config.request_timeout_secs = 301;
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidTimeout)
        ));
    }

    #[test]
    fn validation_valid_config() {
        assert!(valid_config().validate().is_ok());
    }
}
