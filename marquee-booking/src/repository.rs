use crate::models::{Booking, Rider};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use marquee_core::CoreResult;
use uuid::Uuid;

/// Persistence seam for the booking aggregate. Each method is one atomic
/// unit of work; implementations must not let a partial write survive.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Claim the table referenced by `booking.table_id` (available → taken)
    /// and insert the booking, atomically with respect to concurrent claims
    /// of the same table. The loser of the race gets `Conflict`, never a
    /// second booking on the table.
    async fn create_vip_booking(&self, booking: &Booking) -> CoreResult<()>;

    /// Insert the booking and all rider children in one transaction.
    async fn create_rider_booking(&self, booking: &Booking, riders: &[Rider]) -> CoreResult<()>;

    async fn get_booking(&self, id: Uuid) -> CoreResult<Option<Booking>>;

    async fn riders_for_booking(&self, booking_id: Uuid) -> CoreResult<Vec<Rider>>;

    /// Overwrite the active OTP challenge: new code, new expiry, verified
    /// flag cleared. `NotFound` if the booking does not exist.
    async fn set_otp(
        &self,
        booking_id: Uuid,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> CoreResult<()>;

    /// Mark the challenge verified and clear the stored code so it cannot be
    /// replayed. `NotFound` if the booking does not exist.
    async fn mark_otp_verified(&self, booking_id: Uuid) -> CoreResult<()>;
}
