use crate::CoreResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Lifecycle of a payment attempt. Mirrored on the owning booking so the
/// booking can be read without joining the payments table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Completed => "COMPLETED",
            PaymentStatus::Failed => "FAILED",
        }
    }

    /// A terminal status is never transitioned again.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(PaymentStatus::Pending),
            "COMPLETED" => Ok(PaymentStatus::Completed),
            "FAILED" => Ok(PaymentStatus::Failed),
            other => Err(format!("unknown payment status: {other}")),
        }
    }
}

/// Checkout context issued by the gateway. The raw response is kept verbatim
/// for audit alongside the fields the client needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub session_id: String,
    pub session_key: Option<String>,
    pub raw: serde_json::Value,
}

/// Seam to the external payment provider. Production talks to the hosted
/// checkout REST API; tests plug in a mock.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Open a hosted checkout session with the merchant credentials the
    /// implementation was constructed with.
    async fn create_checkout_session(&self) -> CoreResult<CheckoutSession>;

    /// Synchronous order-status query, used for manual reconciliation only.
    /// The body is returned opaque.
    async fn get_order_status(&self, transaction_id: &str) -> CoreResult<serde_json::Value>;
}
