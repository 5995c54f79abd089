use crate::models::Payment;
use async_trait::async_trait;
use marquee_booking::Booking;
use marquee_core::payment::PaymentStatus;
use marquee_core::CoreResult;
use uuid::Uuid;

/// Result of a conditional terminal transition keyed by transaction id.
#[derive(Debug, Clone)]
pub enum TransitionOutcome {
    /// The payment was PENDING and has been moved to the target status; the
    /// booking's payment_status was updated in the same transaction.
    Applied { payment: Payment, booking: Booking },
    /// The payment was already COMPLETED or FAILED; nothing was written.
    AlreadyTerminal(Payment),
    /// No payment carries this transaction id (possibly deleted by a retry).
    NotFound,
}

/// Persistence seam for payment attempts.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Insert a PENDING payment. Fails with `Conflict` when another PENDING
    /// payment already exists for the booking, including when a concurrent
    /// insert wins the race.
    async fn create_payment(&self, payment: &Payment) -> CoreResult<()>;

    async fn find_pending_for_booking(&self, booking_id: Uuid) -> CoreResult<Option<Payment>>;

    /// Remove stale PENDING rows for the booking; returns how many were
    /// deleted. Terminal rows are never touched.
    async fn delete_pending_for_booking(&self, booking_id: Uuid) -> CoreResult<u64>;

    /// Atomically: if the payment with this transaction id is PENDING, move
    /// it to `target`, mirror the status onto the owning booking and store
    /// the raw webhook payload — all in one transaction. Row-level locking
    /// must serialize this against concurrent deliveries and retry
    /// deletions.
    async fn transition_if_pending(
        &self,
        transaction_id: &str,
        target: PaymentStatus,
        raw: &serde_json::Value,
    ) -> CoreResult<TransitionOutcome>;
}
