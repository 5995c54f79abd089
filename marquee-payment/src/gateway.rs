use async_trait::async_trait;
use marquee_core::payment::{CheckoutSession, PaymentGateway};
use marquee_core::{CoreError, CoreResult};
use serde::Deserialize;
use std::time::Duration;

/// Merchant credentials and endpoint layout for the hosted checkout REST API.
/// Injected explicitly at construction; nothing is read from ambient process
/// state.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    pub base_url: String,
    pub api_version: String,
    pub merchant_id: String,
    pub operator_id: String,
    pub password: String,
    pub timeout_secs: u64,
}

/// reqwest-backed client for the gateway's hosted checkout API. Every call
/// carries the client-level timeout; expiry surfaces as `Upstream`.
pub struct HostedCheckoutClient {
    http: reqwest::Client,
    config: GatewayConfig,
}

impl HostedCheckoutClient {
    pub fn new(config: GatewayConfig) -> CoreResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CoreError::Internal(format!("failed to build http client: {e}")))?;
        Ok(Self { http, config })
    }

    fn session_url(&self) -> String {
        format!(
            "{}/version/{}/merchant/{}/session",
            self.config.base_url, self.config.api_version, self.config.merchant_id
        )
    }

    fn order_url(&self, transaction_id: &str) -> String {
        format!(
            "{}/version/{}/merchant/{}/order/{}",
            self.config.base_url, self.config.api_version, self.config.merchant_id, transaction_id
        )
    }
}

#[async_trait]
impl PaymentGateway for HostedCheckoutClient {
    async fn create_checkout_session(&self) -> CoreResult<CheckoutSession> {
        let response = self
            .http
            .post(self.session_url())
            .basic_auth(&self.config.operator_id, Some(&self.config.password))
            .json(&serde_json::json!({ "apiOperation": "CREATE_CHECKOUT_SESSION" }))
            .send()
            .await
            .map_err(|e| CoreError::Upstream(format!("checkout session request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CoreError::Upstream(format!("failed to read gateway response: {e}")))?;

        if !status.is_success() {
            return Err(CoreError::Upstream(format!(
                "failed to create payment session: {status}: {body}"
            )));
        }

        let raw: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| CoreError::Upstream(format!("malformed gateway response: {e}")))?;
        let session_id = raw["session"]["id"]
            .as_str()
            .ok_or_else(|| CoreError::Upstream("gateway response carries no session id".into()))?
            .to_string();
        let session_key = raw["session"]["aes256Key"].as_str().map(String::from);

        Ok(CheckoutSession {
            session_id,
            session_key,
            raw,
        })
    }

    async fn get_order_status(&self, transaction_id: &str) -> CoreResult<serde_json::Value> {
        let response = self
            .http
            .get(self.order_url(transaction_id))
            .basic_auth(&self.config.operator_id, Some(&self.config.password))
            .send()
            .await
            .map_err(|e| CoreError::Upstream(format!("order status request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CoreError::Upstream(format!("failed to read gateway response: {e}")))?;

        if !status.is_success() {
            return Err(CoreError::Upstream(format!(
                "failed to verify payment: {status}: {body}"
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| CoreError::Upstream(format!("malformed gateway response: {e}")))
    }
}

/// Gateway stand-in for tests and local development. Issues a fixed session
/// and, when `fail` is set, simulates an unreachable provider.
#[derive(Debug, Default)]
pub struct MockGateway {
    pub fail: bool,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self { fail: true }
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_checkout_session(&self) -> CoreResult<CheckoutSession> {
        if self.fail {
            return Err(CoreError::Upstream("simulated gateway failure".into()));
        }
        let raw = serde_json::json!({
            "result": "SUCCESS",
            "session": {
                "id": "SESSION0002899837025",
                "aes256Key": "mock-aes-key",
                "authenticationLimit": 25
            }
        });
        Ok(CheckoutSession {
            session_id: "SESSION0002899837025".into(),
            session_key: Some("mock-aes-key".into()),
            raw,
        })
    }

    async fn get_order_status(&self, transaction_id: &str) -> CoreResult<serde_json::Value> {
        if self.fail {
            return Err(CoreError::Upstream("simulated gateway failure".into()));
        }
        Ok(serde_json::json!({
            "id": transaction_id,
            "result": "SUCCESS",
            "status": "CAPTURED"
        }))
    }
}
