use crate::repository::{PaymentStore, TransitionOutcome};
use marquee_core::notify::Notifier;
use marquee_core::payment::PaymentStatus;
use marquee_core::{CoreError, CoreResult};
use std::sync::Arc;
use tracing::{info, warn};

/// What a webhook delivery amounted to. Everything except `Applied` is a
/// no-op, which is what makes redelivery safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Applied(PaymentStatus),
    AlreadyProcessed,
    /// No payment carries this transaction id; logged and dropped. This also
    /// covers a webhook racing a retry that deleted the PENDING row.
    UnknownTransaction,
}

/// Authoritative finalization path for payments. Consumes asynchronous
/// gateway callbacks and transitions Payment + Booking exactly once per
/// transaction id.
pub struct WebhookReconciler {
    payments: Arc<dyn PaymentStore>,
    notifier: Arc<dyn Notifier>,
}

impl WebhookReconciler {
    pub fn new(payments: Arc<dyn PaymentStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { payments, notifier }
    }

    /// The webhook contract is exactly `{"order": {"id": …}, "result":
    /// {"status": …}}`; anything else is malformed and rejected without
    /// touching state.
    pub async fn handle(&self, payload: serde_json::Value) -> CoreResult<ReconcileOutcome> {
        let transaction_id = payload
            .get("order")
            .and_then(|order| order.get("id"))
            .and_then(|id| id.as_str())
            .ok_or_else(|| CoreError::Validation("invalid webhook payload".into()))?
            .to_string();
        let outcome = payload
            .get("result")
            .and_then(|result| result.get("status"))
            .and_then(|status| status.as_str())
            .ok_or_else(|| CoreError::Validation("invalid webhook payload".into()))?;

        let target = if outcome == "SUCCESS" {
            PaymentStatus::Completed
        } else {
            PaymentStatus::Failed
        };

        match self
            .payments
            .transition_if_pending(&transaction_id, target, &payload)
            .await?
        {
            TransitionOutcome::NotFound => {
                warn!(%transaction_id, "webhook for unknown transaction, dropped");
                Ok(ReconcileOutcome::UnknownTransaction)
            }
            TransitionOutcome::AlreadyTerminal(payment) => {
                info!(
                    %transaction_id,
                    status = payment.status.as_str(),
                    "webhook redelivery for settled payment, no-op"
                );
                Ok(ReconcileOutcome::AlreadyProcessed)
            }
            TransitionOutcome::Applied { payment, booking } => {
                info!(
                    %transaction_id,
                    booking_id = %booking.id,
                    status = target.as_str(),
                    "payment reconciled"
                );
                if target == PaymentStatus::Completed {
                    // Runs after the transition committed; a failure here
                    // must never unwind the payment state.
                    self.send_confirmation(&booking, &payment).await;
                }
                Ok(ReconcileOutcome::Applied(target))
            }
        }
    }

    async fn send_confirmation(&self, booking: &marquee_booking::Booking, payment: &crate::models::Payment) {
        let Some(email) = booking.email.as_deref() else {
            warn!(booking_id = %booking.id, "no contact email, confirmation not sent");
            return;
        };
        let name = booking.full_name.as_deref().unwrap_or("Guest");
        let body = format!(
            "Hi {name},\n\n\
             Your booking has been successfully confirmed.\n\n\
             Booking ID: {}\n\
             Amount Paid: {} {}\n\n\
             Thank you for booking with us!",
            booking.id, payment.currency, payment.amount
        );
        if let Err(err) = self
            .notifier
            .send_email(email, "Booking Confirmed", &body)
            .await
        {
            warn!(booking_id = %booking.id, %err, "confirmation email failed");
        }
    }
}
