use crate::repository::BookingStore;
use chrono::{Duration, Utc};
use marquee_core::notify::Notifier;
use marquee_core::{CoreError, CoreResult};
use rand::Rng;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Codes stay valid for a fixed window from issuance; repeated wrong guesses
/// do not extend it.
pub const OTP_TTL_MINUTES: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpVerification {
    Verified,
    /// The booking was already verified; repeat verification is a no-op.
    AlreadyVerified,
}

/// One-time-passcode gate on booking confirmation. One challenge in flight
/// per booking: issuing a new code invalidates the previous one.
pub struct OtpChallenge {
    bookings: Arc<dyn BookingStore>,
    notifier: Arc<dyn Notifier>,
}

impl OtpChallenge {
    pub fn new(bookings: Arc<dyn BookingStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { bookings, notifier }
    }

    /// Generate a fresh 6-digit code, store it with a new expiry and deliver
    /// it to the booking contact. Delivery is best-effort.
    pub async fn issue(&self, booking_id: Uuid) -> CoreResult<()> {
        let booking = self
            .bookings
            .get_booking(booking_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("booking {booking_id}")))?;

        let code = rand::thread_rng().gen_range(100_000..=999_999).to_string();
        let expires_at = Utc::now() + Duration::minutes(OTP_TTL_MINUTES);
        self.bookings.set_otp(booking_id, &code, expires_at).await?;

        match booking.email.as_deref() {
            Some(email) => {
                let body = format!(
                    "Your OTP code is: {code}\nIt will expire in {OTP_TTL_MINUTES} minutes."
                );
                if let Err(err) = self
                    .notifier
                    .send_email(email, "Your Booking OTP Code", &body)
                    .await
                {
                    warn!(booking_id = %booking_id, %err, "OTP delivery failed");
                }
            }
            None => {
                warn!(booking_id = %booking_id, "booking has no contact email, OTP not delivered");
            }
        }

        info!(booking_id = %booking_id, "OTP issued");
        Ok(())
    }

    /// Check a submitted code. Mismatch is reported before expiry, matching
    /// codes are single-use, and a verified booking stays verified.
    pub async fn verify(&self, booking_id: Uuid, code: &str) -> CoreResult<OtpVerification> {
        let booking = self
            .bookings
            .get_booking(booking_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("booking {booking_id}")))?;

        if booking.otp_verified {
            return Ok(OtpVerification::AlreadyVerified);
        }

        if booking.otp_code.as_deref() != Some(code) {
            return Err(CoreError::Validation("invalid OTP".into()));
        }

        let expires_at = booking
            .otp_expires_at
            .ok_or_else(|| CoreError::Validation("OTP expired".into()))?;
        if Utc::now() > expires_at {
            return Err(CoreError::Validation("OTP expired".into()));
        }

        self.bookings.mark_otp_verified(booking_id).await?;
        info!(booking_id = %booking_id, "OTP verified");
        Ok(OtpVerification::Verified)
    }
}
