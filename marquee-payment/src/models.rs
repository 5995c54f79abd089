use chrono::{DateTime, Utc};
use marquee_core::payment::PaymentStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One payment attempt against a booking. At most one attempt is PENDING per
/// booking at any time; terminal rows are kept as the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub package_id: Uuid,
    pub amount: i32,
    pub currency: String,
    /// Locally generated, globally unique. The gateway echoes it back in
    /// webhooks as the order id.
    pub transaction_id: String,
    pub status: PaymentStatus,
    /// Raw gateway payload, captured verbatim for audit and debugging.
    pub gateway_response: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    pub fn new(
        booking_id: Uuid,
        package_id: Uuid,
        amount: i32,
        currency: String,
        transaction_id: String,
        gateway_response: serde_json::Value,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            booking_id,
            package_id,
            amount,
            currency,
            transaction_id,
            status: PaymentStatus::Pending,
            gateway_response,
            created_at: now,
            updated_at: now,
        }
    }
}
