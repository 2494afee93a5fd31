//! Authenticated HTTP transport for the Mentom gateway.
//!
//! Pure transport, no business logic: bound to a base URL, a bearer
//! credential and a fixed timeout. Retries, if any, are the caller's
//! decision.

use std::time::Duration;

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use crate::ports::PaymentError;

/// Thin bearer-authenticated client for the gateway REST surface.
pub struct GatewayClient {
    base_url: String,
    api_key: SecretString,
    timeout: Duration,
    http: reqwest::Client,
}

impl GatewayClient {
    /// Create a client bound to `base_url` with a fixed request timeout.
    pub fn new(base_url: impl Into<String>, api_key: SecretString, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            timeout,
            http: reqwest::Client::new(),
        }
    }

    /// `GET` a gateway path.
    pub async fn get(&self, path: &str) -> Result<Value, PaymentError> {
        self.send(Method::GET, path, None, &[]).await
    }

    /// `POST` a JSON body to a gateway path.
    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, PaymentError> {
        self.send(Method::POST, path, Some(body), &[]).await
    }

    /// `POST` a JSON body with additional request headers.
    pub async fn post_with_headers(
        &self,
        path: &str,
        body: &Value,
        headers: &[(&str, &str)],
    ) -> Result<Value, PaymentError> {
        self.send(Method::POST, path, Some(body), headers).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        headers: &[(&str, &str)],
    ) -> Result<Value, PaymentError> {
        let url = self.endpoint(path);

        let mut request = self
            .http
            .request(method, &url)
            .bearer_auth(self.api_key.expose_secret())
            .timeout(self.timeout);

        if let Some(body) = body {
            request = request.json(body);
        }
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                PaymentError::transport(format!("gateway request timed out: {}", url))
            } else {
                PaymentError::transport(e.to_string())
            }
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| PaymentError::transport(e.to_string()))?;

        if !status.is_success() {
            tracing::error!(
                status = status.as_u16(),
                path = %path,
                body = %text,
                "gateway request failed"
            );
            return Err(PaymentError::Gateway {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| PaymentError::Gateway {
            status: status.as_u16(),
            body: format!("unparseable response body: {}", e),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> GatewayClient {
        GatewayClient::new(
            base_url,
            SecretString::new("mk_test_key".to_string()),
            Duration::from_secs(15),
        )
    }

    #[test]
    fn endpoint_joins_base_and_path() {
        let client = client("https://gateway.mentomdashboard.com");
        assert_eq!(
            client.endpoint("/payment/tx_1"),
            "https://gateway.mentomdashboard.com/payment/tx_1"
        );
    }

    #[test]
    fn trailing_slashes_are_trimmed_from_base_url() {
        let client = client("https://sandbox.mentomdashboard.com///");
        assert_eq!(
            client.endpoint("/payment/sale"),
            "https://sandbox.mentomdashboard.com/payment/sale"
        );
    }
}
