use crate::models::Payment;
use crate::repository::PaymentStore;
use marquee_booking::BookingStore;
use marquee_catalog::CatalogStore;
use marquee_core::payment::{PaymentGateway, PaymentStatus};
use marquee_core::{CoreError, CoreResult};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// What the client needs to hand the hosted checkout widget.
#[derive(Debug, Clone, Serialize)]
pub struct OpenedSession {
    pub transaction_id: String,
    pub session_id: String,
    pub session_key: Option<String>,
    pub amount: i32,
    pub currency: String,
}

/// Opens gateway checkout sessions and tracks the one in-flight payment per
/// booking. The mapping from external transaction to internal booking is
/// fixed before the gateway is ever contacted.
pub struct PaymentSessionManager {
    bookings: Arc<dyn BookingStore>,
    catalog: Arc<dyn CatalogStore>,
    payments: Arc<dyn PaymentStore>,
    gateway: Arc<dyn PaymentGateway>,
    currency: String,
}

impl PaymentSessionManager {
    pub fn new(
        bookings: Arc<dyn BookingStore>,
        catalog: Arc<dyn CatalogStore>,
        payments: Arc<dyn PaymentStore>,
        gateway: Arc<dyn PaymentGateway>,
        currency: String,
    ) -> Self {
        Self {
            bookings,
            catalog,
            payments,
            gateway,
            currency,
        }
    }

    pub async fn open_session(
        &self,
        booking_id: Uuid,
        package_id: Uuid,
        amount: i32,
    ) -> CoreResult<OpenedSession> {
        let booking = self
            .bookings
            .get_booking(booking_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("booking {booking_id}")))?;

        let package = self
            .catalog
            .get_package(package_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("package {package_id}")))?;

        if amount <= 0 {
            return Err(CoreError::Validation("invalid payment amount".into()));
        }

        // The client-quoted amount is advisory only; re-derive it from the
        // package price and the booked seats.
        let expected = package.quote(booking.seats_booked);
        if amount != expected {
            return Err(CoreError::Validation(format!(
                "amount mismatch: expected {expected}, got {amount}"
            )));
        }

        if self
            .payments
            .find_pending_for_booking(booking_id)
            .await?
            .is_some()
        {
            return Err(CoreError::Conflict(
                "payment already initiated for this booking".into(),
            ));
        }

        let transaction_id = Self::transaction_id(booking_id);

        // Network call happens without any store lock held; nothing has been
        // persisted yet, so a gateway failure leaves no dangling PENDING row.
        let session = self.gateway.create_checkout_session().await?;

        let payment = Payment::new(
            booking_id,
            package_id,
            amount,
            self.currency.clone(),
            transaction_id.clone(),
            session.raw.clone(),
        );
        self.payments.create_payment(&payment).await?;

        info!(
            booking_id = %booking_id,
            transaction_id = %transaction_id,
            session_id = %session.session_id,
            "payment session opened"
        );

        Ok(OpenedSession {
            transaction_id,
            session_id: session.session_id,
            session_key: session.session_key,
            amount,
            currency: self.currency.clone(),
        })
    }

    /// Abandon a stuck PENDING attempt so a fresh session can be opened.
    /// Refused once the booking has been paid. Returns how many stale rows
    /// were removed. Never contacts the gateway.
    pub async fn retry_payment(&self, booking_id: Uuid) -> CoreResult<u64> {
        let booking = self
            .bookings
            .get_booking(booking_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("booking {booking_id}")))?;

        if booking.payment_status == PaymentStatus::Completed {
            return Err(CoreError::Conflict("payment already completed".into()));
        }

        let removed = self.payments.delete_pending_for_booking(booking_id).await?;
        info!(booking_id = %booking_id, removed, "payment retry allowed");
        Ok(removed)
    }

    /// Administrative, read-only proxy of the gateway's order-status query.
    pub async fn verify_payment(&self, transaction_id: &str) -> CoreResult<serde_json::Value> {
        self.gateway.get_order_status(transaction_id).await
    }

    fn transaction_id(booking_id: Uuid) -> String {
        let suffix = Uuid::new_v4().simple().to_string()[..8].to_uppercase();
        format!("BOOK-{}-{}", booking_id.simple(), suffix)
    }
}
